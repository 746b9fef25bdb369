use super::errors::RejectionReason;
use super::field_extractor::{ExtractionContext, FieldExtractor, FieldExtractors, PersonName};
use super::models::{CandidateProfile, ExtractedText};

pub struct ProfileAssembler {
    extractors: FieldExtractors,
}

impl ProfileAssembler {
    pub fn new(extractors: FieldExtractors) -> Self {
        Self { extractors }
    }

    /// A missing email is the only rejection; every other field degrades to its sentinel.
    pub fn assemble(&self, text: &ExtractedText) -> Result<CandidateProfile, RejectionReason> {
        let normalized = text.normalized.as_str();
        let bare = ExtractionContext {
            raw_text: &text.raw,
            email: None,
        };

        let email = self
            .extractors
            .email
            .extract(normalized, &bare)
            .ok_or(RejectionReason::MissingIdentity)?;

        let ctx = ExtractionContext {
            raw_text: &text.raw,
            email: Some(&email),
        };

        let name = self
            .extractors
            .name
            .extract(normalized, &ctx)
            .unwrap_or_else(PersonName::unknown);
        let phone = self.extractors.phone.extract(normalized, &ctx);
        let location = self
            .extractors
            .location
            .extract(normalized, &ctx)
            .unwrap_or_else(|| self.extractors.location.unmatched());
        let skills = self
            .extractors
            .skills
            .extract(normalized, &ctx)
            .unwrap_or_default();

        Ok(CandidateProfile {
            email: Some(email),
            given_name: name.given,
            family_name: name.family,
            phone,
            city: location.city,
            country: location.country,
            skills,
        })
    }
}

pub fn score_confidence(profile: &CandidateProfile, ocr_used: bool) -> f64 {
    let mut score: f64 = 0.0;

    if profile.email.as_deref().is_some_and(|v| !v.trim().is_empty()) {
        score += 0.4;
    }
    if profile.phone.as_deref().is_some_and(|v| !v.trim().is_empty()) {
        score += 0.2;
    }
    if profile.has_known_name() {
        score += 0.15;
    }
    if profile.city.is_some() {
        score += 0.1;
    }
    if !profile.skills.is_empty() {
        score += 0.1;
    }
    if !ocr_used {
        score += 0.05;
    }

    score.min(1.0)
}
