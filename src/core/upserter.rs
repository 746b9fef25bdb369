use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use super::errors::CoreError;
use super::models::{CandidateProfile, ProfileRecord, UpsertOutcome, UNSPECIFIED};
use super::profile_store::ProfileRegistry;

pub struct ProfileUpserter {
    registry: Arc<dyn ProfileRegistry>,
    default_skill_level: u8,
    availability_window_days: i64,
}

impl ProfileUpserter {
    pub fn new(
        registry: Arc<dyn ProfileRegistry>,
        default_skill_level: u8,
        availability_window_days: i64,
    ) -> Self {
        Self {
            registry,
            default_skill_level,
            availability_window_days: availability_window_days.max(1),
        }
    }

    /// Creates or refreshes the profile keyed by the candidate's email. Contact
    /// fields are overwritten; skills only ever accumulate.
    pub async fn upsert(&self, candidate: CandidateProfile) -> Result<UpsertOutcome, CoreError> {
        let email = candidate
            .email
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(CoreError::MissingIdentity)?
            .to_lowercase();

        let level = self.default_skill_level;
        let window = Duration::days(self.availability_window_days);
        let key = email.clone();

        let (record, created) = self
            .registry
            .upsert_with(
                &email,
                Box::new(move |current: Option<ProfileRecord>| {
                    let now = Utc::now();
                    let mut record = current.unwrap_or_else(|| {
                        let today = now.date_naive();
                        ProfileRecord {
                            id: Uuid::new_v4(),
                            email: key,
                            given_name: String::new(),
                            family_name: String::new(),
                            phone: String::new(),
                            city: String::new(),
                            country: String::new(),
                            available_from: today,
                            available_until: today + window,
                            skills: Vec::new(),
                            created_at: now,
                            updated_at: now,
                        }
                    });

                    record.given_name = candidate.given_name;
                    record.family_name = candidate.family_name;
                    record.phone = or_unspecified(candidate.phone);
                    record.city = or_unspecified(candidate.city);
                    record.country = or_unspecified(candidate.country);
                    record.attach_skills(candidate.skills.iter().map(String::as_str), level);
                    record.updated_at = now;
                    record
                }),
            )
            .await?;

        info!(
            email = %record.email,
            created,
            skills = record.skills.len(),
            "profile upserted"
        );

        Ok(UpsertOutcome {
            profile_id: record.id,
            created,
        })
    }
}

fn or_unspecified(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNSPECIFIED.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::core::profile_store::JsonProfileStore;

    fn candidate(skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            email: Some("jean.martin@firma.fr".to_string()),
            given_name: "Jean".to_string(),
            family_name: "Martin".to_string(),
            phone: Some("0612345678".to_string()),
            city: Some("Nouakchott".to_string()),
            country: Some("Mauritanie".to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn upserter(dir: &tempfile::TempDir) -> (ProfileUpserter, Arc<JsonProfileStore>) {
        let store = Arc::new(JsonProfileStore::new_with_path(dir.path().join("profiles.json")));
        (ProfileUpserter::new(store.clone(), 2, 365), store)
    }

    #[tokio::test]
    async fn upsert_twice_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let (upserter, store) = upserter(&temp);

        let first = upserter.upsert(candidate(&["Docker", "Python"])).await.unwrap();
        let second = upserter.upsert(candidate(&["Docker", "Python"])).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.profile_id, second.profile_id);

        let profiles = store.list_profiles().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].skills.len(), 2);
        assert!(profiles[0].skills.iter().all(|s| s.level == 2));
        assert_eq!(
            profiles[0].available_until - profiles[0].available_from,
            Duration::days(365)
        );
    }

    #[tokio::test]
    async fn existing_profile_is_overwritten_and_skills_merged() {
        let temp = tempfile::tempdir().unwrap();
        let (upserter, store) = upserter(&temp);

        upserter.upsert(candidate(&["Python"])).await.unwrap();

        let mut moved = candidate(&["python", "Docker"]);
        moved.city = None;
        moved.phone = None;
        moved.country = Some("Sénégal".to_string());
        upserter.upsert(moved).await.unwrap();

        let profile = store
            .find_by_email("jean.martin@firma.fr")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.city, UNSPECIFIED);
        assert_eq!(profile.phone, UNSPECIFIED);
        assert_eq!(profile.country, "Sénégal");
        let names: Vec<&str> = profile.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Docker"]);
    }

    #[tokio::test]
    async fn candidate_without_email_never_touches_registry() {
        let temp = tempfile::tempdir().unwrap();
        let (upserter, store) = upserter(&temp);

        let mut anonymous = candidate(&["Python"]);
        anonymous.email = None;
        let result = upserter.upsert(anonymous).await;

        assert!(matches!(result, Err(CoreError::MissingIdentity)));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn concurrent_upserts_of_one_email_serialize() {
        let temp = tempfile::tempdir().unwrap();
        let (upserter, store) = upserter(&temp);

        let (a, b) = tokio::join!(
            upserter.upsert(candidate(&["Python"])),
            upserter.upsert(candidate(&["Docker"]))
        );
        assert_ne!(a.unwrap().created, b.unwrap().created);

        let profiles = store.list_profiles().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].skills.len(), 2);
    }
}
