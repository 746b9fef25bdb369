use std::path::{Path, PathBuf};

use super::errors::CoreError;
use super::field_extractor::whole_word_regex;
use super::models::RuntimeSettings;

pub struct SettingsStore {
    file_path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            file_path: settings_path(),
        }
    }

    pub fn with_path(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// A missing file means defaults; a malformed one is a configuration error.
    pub async fn load(&self) -> Result<RuntimeSettings, CoreError> {
        if !tokio::fs::try_exists(&self.file_path)
            .await
            .unwrap_or(false)
        {
            return Ok(RuntimeSettings::default());
        }

        let content = tokio::fs::read_to_string(&self.file_path)
            .await
            .map_err(|err| {
                CoreError::Configuration(format!(
                    "failed to read settings file {}: {err}",
                    self.file_path.display()
                ))
            })?;

        let parsed = serde_json::from_str::<RuntimeSettings>(&content).map_err(|err| {
            CoreError::Configuration(format!(
                "invalid JSON in settings file {}: {err}",
                self.file_path.display()
            ))
        })?;

        let settings = parsed.sanitized();
        validate(&settings)?;
        Ok(settings)
    }

    pub async fn save(&self, settings: &RuntimeSettings) -> Result<(), CoreError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::from)?;
        tokio::fs::write(&self.file_path, json).await?;
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Regex-bearing settings are compiled once here so a bad entry fails at startup.
fn validate(settings: &RuntimeSettings) -> Result<(), CoreError> {
    for pattern in &settings.phone_patterns {
        regex::Regex::new(pattern).map_err(|err| {
            CoreError::Configuration(format!("invalid phone pattern {pattern:?}: {err}"))
        })?;
    }
    for term in settings
        .skill_vocabulary
        .iter()
        .chain(settings.geo_index.iter().map(|entry| &entry.city))
    {
        whole_word_regex(term)?;
    }
    if settings.ocr_enabled && settings.ocr_languages.is_empty() {
        return Err(CoreError::Configuration(
            "ocrLanguages must not be empty when OCR is enabled".to_string(),
        ));
    }
    Ok(())
}

fn settings_path() -> PathBuf {
    app_data_root().join("settings.json")
}

pub fn app_data_root() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(local_app_data) = std::env::var("LOCALAPPDATA") {
            return PathBuf::from(local_app_data).join("CvProfileExtractor");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("CvProfileExtractor");
        }
    }

    if let Some(path) = dirs::data_local_dir() {
        return path.join("CvProfileExtractor");
    }

    PathBuf::from(".").join("CvProfileExtractor")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::MIN_OCR_DPI;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let store = SettingsStore::with_path(temp.path().join("absent.json"));
        let settings = store.load().await.unwrap();
        assert_eq!(settings.ocr_dpi, MIN_OCR_DPI);
        assert_eq!(settings.default_country, "Mauritanie");
    }

    #[tokio::test]
    async fn partial_file_is_merged_over_defaults_and_sanitized() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "ocrDpi": 150, "maxConcurrentDocuments": 0, "defaultCountry": "Sénégal",
                 "geoIndex": [{ "city": "Dakar", "country": "Sénégal" }] }"#,
        )
        .unwrap();

        let settings = SettingsStore::with_path(path).load().await.unwrap();
        assert_eq!(settings.ocr_dpi, MIN_OCR_DPI);
        assert_eq!(settings.max_concurrent_documents, 1);
        assert_eq!(settings.geo_index.len(), 1);
        assert_eq!(settings.geo_index[0].city, "Dakar");
        assert_eq!(settings.skill_vocabulary.len(), 18);
    }

    #[tokio::test]
    async fn invalid_json_and_patterns_are_configuration_errors() {
        let temp = tempfile::tempdir().unwrap();
        let broken = temp.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let result = SettingsStore::with_path(broken).load().await;
        assert!(matches!(result, Err(CoreError::Configuration(_))));

        let bad_pattern = temp.path().join("pattern.json");
        std::fs::write(&bad_pattern, r#"{ "phonePatterns": ["(\\d"] }"#).unwrap();
        let result = SettingsStore::with_path(bad_pattern).load().await;
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }

    #[tokio::test]
    async fn save_then_load_keeps_custom_values() {
        let temp = tempfile::tempdir().unwrap();
        let store = SettingsStore::with_path(temp.path().join("conf").join("settings.json"));
        let settings = RuntimeSettings {
            ocr_enabled: false,
            default_skill_level: 4,
            ..RuntimeSettings::default()
        };

        store.save(&settings).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert!(!loaded.ocr_enabled);
        assert_eq!(loaded.default_skill_level, 4);
    }
}
