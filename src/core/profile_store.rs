use std::path::{Path, PathBuf};

use chrono::Utc;
use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::debug;

use super::errors::CoreError;
use super::models::ProfileRecord;
use super::settings_store::app_data_root;

/// Builds the stored record from the current one, if any.
pub type ProfileMutation<'a> = Box<dyn FnOnce(Option<ProfileRecord>) -> ProfileRecord + Send + 'a>;

/// Persistence boundary for consultant profiles, keyed by lowercase email.
pub trait ProfileRegistry: Send + Sync {
    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<ProfileRecord>, CoreError>>;

    /// Additive; returns how many skills were new. Unknown emails are a conflict.
    fn attach_skills<'a>(
        &'a self,
        email: &'a str,
        names: &'a [String],
        level: u8,
    ) -> BoxFuture<'a, Result<usize, CoreError>>;

    /// Applies `mutation` and commits it in one write. Returns the stored
    /// record and whether it was newly created.
    fn upsert_with<'a>(
        &'a self,
        email: &'a str,
        mutation: ProfileMutation<'a>,
    ) -> BoxFuture<'a, Result<(ProfileRecord, bool), CoreError>>;
}

/// All profiles in one JSON array, replaced atomically on every write.
pub struct JsonProfileStore {
    path: PathBuf,
    mutex: Mutex<()>,
}

impl JsonProfileStore {
    pub fn new() -> Self {
        Self::new_with_path(app_data_root().join("profiles.json"))
    }

    pub fn new_with_path(path: PathBuf) -> Self {
        Self {
            path,
            mutex: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list_profiles(&self) -> Result<Vec<ProfileRecord>, CoreError> {
        let _lock = self.mutex.lock().await;
        self.load().await
    }

    async fn load(&self) -> Result<Vec<ProfileRecord>, CoreError> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let json = tokio::fs::read_to_string(&self.path).await?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        let profiles = serde_json::from_str::<Vec<ProfileRecord>>(&json)
            .map_err(std::io::Error::from)?;

        let mut seen = std::collections::HashSet::new();
        for profile in &profiles {
            if !seen.insert(profile.email.to_lowercase()) {
                return Err(CoreError::PersistenceConflict {
                    email: profile.email.clone(),
                    detail: format!("duplicate entries in {}", self.path.display()),
                });
            }
        }

        Ok(profiles)
    }

    async fn save(&self, profiles: &[ProfileRecord]) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(profiles).map_err(std::io::Error::from)?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }

    async fn find(&self, email: &str) -> Result<Option<ProfileRecord>, CoreError> {
        let _lock = self.mutex.lock().await;
        let profiles = self.load().await?;
        Ok(profiles
            .into_iter()
            .find(|p| p.email.eq_ignore_ascii_case(email)))
    }

    async fn attach(&self, email: &str, names: &[String], level: u8) -> Result<usize, CoreError> {
        let _lock = self.mutex.lock().await;
        let mut profiles = self.load().await?;
        let profile = profiles
            .iter_mut()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| CoreError::PersistenceConflict {
                email: email.to_string(),
                detail: "no profile to attach skills to".to_string(),
            })?;

        let added = profile.attach_skills(names.iter().map(String::as_str), level);
        if added > 0 {
            profile.updated_at = Utc::now();
            self.save(&profiles).await?;
        }
        Ok(added)
    }

    async fn upsert(
        &self,
        email: &str,
        mutation: ProfileMutation<'_>,
    ) -> Result<(ProfileRecord, bool), CoreError> {
        let _lock = self.mutex.lock().await;
        let mut profiles = self.load().await?;
        let index = profiles
            .iter()
            .position(|p| p.email.eq_ignore_ascii_case(email));

        let current = index.map(|i| profiles[i].clone());
        let record = mutation(current);
        if !record.email.eq_ignore_ascii_case(email) {
            return Err(CoreError::PersistenceConflict {
                email: email.to_string(),
                detail: format!("mutation changed the key to {}", record.email),
            });
        }

        let created = match index {
            Some(i) => {
                profiles[i] = record.clone();
                false
            }
            None => {
                profiles.push(record.clone());
                true
            }
        };

        self.save(&profiles).await?;
        debug!(email, created, total = profiles.len(), "registry written");
        Ok((record, created))
    }
}

impl Default for JsonProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRegistry for JsonProfileStore {
    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<ProfileRecord>, CoreError>> {
        Box::pin(self.find(email))
    }

    fn attach_skills<'a>(
        &'a self,
        email: &'a str,
        names: &'a [String],
        level: u8,
    ) -> BoxFuture<'a, Result<usize, CoreError>> {
        Box::pin(self.attach(email, names, level))
    }

    fn upsert_with<'a>(
        &'a self,
        email: &'a str,
        mutation: ProfileMutation<'a>,
    ) -> BoxFuture<'a, Result<(ProfileRecord, bool), CoreError>> {
        Box::pin(self.upsert(email, mutation))
    }
}
