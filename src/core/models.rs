use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::RejectionReason;

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNSPECIFIED: &str = "unspecified";

/// Concatenated document text, before and after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub raw: String,
    pub normalized: String,
    pub ocr_used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub email: Option<String>,
    pub given_name: String,
    pub family_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub skills: BTreeSet<String>,
}

impl CandidateProfile {
    pub fn has_known_name(&self) -> bool {
        self.given_name != UNKNOWN_NAME || self.family_name != UNKNOWN_NAME
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub name: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub id: Uuid,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub phone: String,
    pub city: String,
    pub country: String,
    pub available_from: NaiveDate,
    pub available_until: NaiveDate,
    #[serde(default)]
    pub skills: Vec<SkillRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn has_skill(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        self.skills.iter().any(|s| s.name.to_lowercase() == wanted)
    }

    /// Adds skills not already held (case-insensitive); existing levels are kept.
    pub fn attach_skills<'a, I>(&mut self, names: I, level: u8) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut added = 0;
        for name in names {
            let name = name.trim();
            if name.is_empty() || self.has_skill(name) {
                continue;
            }
            self.skills.push(SkillRecord {
                name: name.to_string(),
                level,
            });
            added += 1;
        }
        added
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertOutcome {
    pub profile_id: Uuid,
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Created,
    Updated,
    /// Assembled but not persisted (dry run).
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutcome {
    pub source_file: String,
    pub status: OutcomeStatus,
    pub profile_id: Option<Uuid>,
    pub profile: Option<CandidateProfile>,
    pub reason: Option<RejectionReason>,
    pub detail: Option<String>,
    pub ocr_used: bool,
    pub confidence: f64,
}

impl DocumentOutcome {
    pub fn rejected(
        source_file: String,
        reason: RejectionReason,
        detail: Option<String>,
        ocr_used: bool,
    ) -> Self {
        Self {
            source_file,
            status: OutcomeStatus::Rejected,
            profile_id: None,
            profile: None,
            reason: Some(reason),
            detail,
            ocr_used,
            confidence: 0.0,
        }
    }

    /// One-line rendering used in the batch summary.
    pub fn summary_line(&self) -> String {
        match self.status {
            OutcomeStatus::Created => format!("{}: created", self.source_file),
            OutcomeStatus::Updated => format!("{}: updated", self.source_file),
            OutcomeStatus::Accepted => format!("{}: accepted (dry run)", self.source_file),
            OutcomeStatus::Rejected => format!(
                "{}: rejected: {}",
                self.source_file,
                self.reason.unwrap_or(RejectionReason::Internal)
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub created: usize,
    pub updated: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub fn from_outcomes(
        source: String,
        started_at: DateTime<Utc>,
        outcomes: Vec<DocumentOutcome>,
    ) -> Self {
        let completed_at = Utc::now();
        let count = |status: OutcomeStatus| outcomes.iter().filter(|o| o.status == status).count();

        Self {
            source,
            started_at,
            completed_at,
            duration_seconds: (completed_at - started_at).num_milliseconds() as f64 / 1000.0,
            created: count(OutcomeStatus::Created),
            updated: count(OutcomeStatus::Updated),
            accepted: count(OutcomeStatus::Accepted),
            rejected: count(OutcomeStatus::Rejected),
            outcomes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoEntry {
    pub city: String,
    pub country: String,
}

impl GeoEntry {
    fn new(city: &str, country: &str) -> Self {
        Self {
            city: city.to_string(),
            country: country.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeSettings {
    pub tesseract_path: String,
    pub pdftoppm_path: String,
    pub ocr_enabled: bool,
    pub ocr_languages: Vec<String>,
    pub ocr_dpi: u32,
    pub contrast_factor: f32,
    pub sharpness_factor: f32,
    pub ocr_char_whitelist: String,
    pub ocr_page_timeout_seconds: u64,
    pub phone_patterns: Vec<String>,
    pub geo_index: Vec<GeoEntry>,
    pub default_country: String,
    pub skill_vocabulary: Vec<String>,
    pub given_name_lexicon: Vec<String>,
    pub title_words: Vec<String>,
    pub default_skill_level: u8,
    pub availability_window_days: i64,
    pub max_concurrent_documents: usize,
    pub registry_path: Option<PathBuf>,
}

pub const MIN_OCR_DPI: u32 = 300;

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            pdftoppm_path: "pdftoppm".to_string(),
            ocr_enabled: true,
            ocr_languages: vec!["fra".to_string(), "ara".to_string(), "eng".to_string()],
            ocr_dpi: MIN_OCR_DPI,
            contrast_factor: 3.0,
            sharpness_factor: 2.0,
            ocr_char_whitelist: concat!(
                "abcdefghijklmnopqrstuvwxyz",
                "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
                "0123456789@.-_",
                "àéèêëïîôùûçâäÀÉÈÊËÏÎÔÙÛÇÂÄ"
            )
            .to_string(),
            ocr_page_timeout_seconds: 120,
            phone_patterns: vec![
                r"(?:\+?222|00222)[\s.\-]?(?:\d{2}[\s.\-]?){3}\d{2}".to_string(),
                r"\b0[2567][\s.\-]?(?:\d{2}[\s.\-]?){3}\d{2}\b".to_string(),
            ],
            geo_index: vec![
                GeoEntry::new("Nouakchott", "Mauritanie"),
                GeoEntry::new("Nouadhibou", "Mauritanie"),
                GeoEntry::new("Rosso", "Mauritanie"),
                GeoEntry::new("Kaédi", "Mauritanie"),
                GeoEntry::new("Zouérat", "Mauritanie"),
                GeoEntry::new("Atar", "Mauritanie"),
                GeoEntry::new("Kiffa", "Mauritanie"),
                GeoEntry::new("Sélibaby", "Mauritanie"),
                GeoEntry::new("Aïoun", "Mauritanie"),
                GeoEntry::new("Tidjikja", "Mauritanie"),
            ],
            default_country: "Mauritanie".to_string(),
            skill_vocabulary: [
                "Python",
                "Django",
                "Flask",
                "Java",
                "JavaScript",
                "React",
                "Angular",
                "PHP",
                "Laravel",
                "SQL",
                "PostgreSQL",
                "MongoDB",
                "Docker",
                "Git",
                "AWS",
                "Machine Learning",
                "Data Analysis",
                "Power BI",
            ]
            .iter()
            .map(|v| v.to_string())
            .collect(),
            given_name_lexicon: [
                "mohamed",
                "mariem",
                "fatimetou",
                "abdallah",
                "aichetou",
                "jean",
                "marie",
                "pierre",
                "sophie",
                "nouha",
                "ahmed",
                "ali",
                "amina",
                "khadijetou",
                "brahim",
                "salma",
                "amadou",
            ]
            .iter()
            .map(|v| v.to_string())
            .collect(),
            title_words: [
                "développeur",
                "developpeur",
                "developer",
                "ingénieur",
                "ingenieur",
                "engineer",
                "manager",
                "chef",
                "projet",
                "technicien",
                "spécialiste",
                "analyste",
                "consultant",
                "curriculum",
                "vitae",
                "cv",
            ]
            .iter()
            .map(|v| v.to_string())
            .collect(),
            default_skill_level: 2,
            availability_window_days: 365,
            max_concurrent_documents: 1,
            registry_path: None,
        }
    }
}

impl RuntimeSettings {
    /// Clamps numeric values into their usable ranges.
    pub fn sanitized(mut self) -> Self {
        self.ocr_dpi = self.ocr_dpi.max(MIN_OCR_DPI);
        self.max_concurrent_documents = self.max_concurrent_documents.max(1);
        self.ocr_page_timeout_seconds = self.ocr_page_timeout_seconds.max(1);
        self.availability_window_days = self.availability_window_days.max(1);
        if !(self.contrast_factor.is_finite() && self.contrast_factor > 0.0) {
            self.contrast_factor = 1.0;
        }
        if !(self.sharpness_factor.is_finite() && self.sharpness_factor > 0.0) {
            self.sharpness_factor = 1.0;
        }
        if self.tesseract_path.trim().is_empty() {
            self.tesseract_path = "tesseract".to_string();
        }
        if self.pdftoppm_path.trim().is_empty() {
            self.pdftoppm_path = "pdftoppm".to_string();
        }
        self.ocr_languages.retain(|lang| !lang.trim().is_empty());
        self
    }
}
