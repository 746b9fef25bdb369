use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::CoreError;
use super::models::{GeoEntry, RuntimeSettings, UNKNOWN_NAME};
use super::ner::{is_capitalized_word, EntityRecognizer};

/// Inputs shared by every extractor besides the normalized text itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionContext<'a> {
    /// Pre-normalization text, which still has its line structure.
    pub raw_text: &'a str,
    pub email: Option<&'a str>,
}

pub trait FieldExtractor {
    type Value;

    fn extract(&self, text: &str, ctx: &ExtractionContext<'_>) -> Option<Self::Value>;
}

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)",
        r#"(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*"#,
        r#"|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")"#,
        r"@",
        r"(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?",
        r"|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\])",
    ))
    .unwrap()
});

static PHONE_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s.\-()]").unwrap());
static INTERNATIONAL_CANDIDATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+\d[\d\s.\-()]{6,20}\d").unwrap());

static GIVEN_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:pr[ée]nom|first\s+name|given\s+name|forename)\s*:\s*(\p{Lu}[\p{L}'\-]*)")
        .unwrap()
});
static FAMILY_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b((?i:first|given|full)\s+)?",
        r"(?i:last\s+name|family\s+name|surname|nom\s+de\s+famille|nom|name)",
        r"\s*:\s*(\p{Lu}[\p{L}'\-]*)",
    ))
    .unwrap()
});
static FAMILY_FIRST_FULL_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:nom\s+et\s+pr[ée]nom|nom\s+pr[ée]nom)\s*:\s*(\p{Lu}[\p{L}'\-]*)\s+(\p{Lu}[\p{L}'\-]*)")
        .unwrap()
});
static GIVEN_FIRST_FULL_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:full\s+name|nom\s+complet)\s*:\s*(\p{Lu}[\p{L}'\-]*)\s+(\p{Lu}[\p{L}'\-]*)")
        .unwrap()
});
static BARE_NAME_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b((?i:first|given|full|last|family)\s+)?",
        r"(?i:nom|name)\s*:\s*(\p{Lu}[\p{L}'\-]*)[\s,]+(\p{Lu}[\p{L}'\-]*)",
    ))
    .unwrap()
});
static EMAIL_LOCAL_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._\-]").unwrap());

/// Words that look like capitalized names at the top of a CV but are headings.
const LABEL_WORDS: [&str; 16] = [
    "nom",
    "prénom",
    "prenom",
    "name",
    "email",
    "mail",
    "tel",
    "téléphone",
    "telephone",
    "phone",
    "contact",
    "adresse",
    "address",
    "skills",
    "compétences",
    "profil",
];

const LEADING_LINES: usize = 30;

pub struct EmailExtractor;

impl FieldExtractor for EmailExtractor {
    type Value = String;

    fn extract(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<String> {
        EMAIL_RE.find(text).map(|m| m.as_str().to_lowercase())
    }
}

pub struct PhoneExtractor {
    patterns: Vec<Regex>,
}

impl PhoneExtractor {
    pub fn new(patterns: &[String]) -> Result<Self, CoreError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|err| {
                    CoreError::Configuration(format!("invalid phone pattern {p:?}: {err}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl FieldExtractor for PhoneExtractor {
    type Value = String;

    fn extract(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<String> {
        for pattern in &self.patterns {
            if let Some(m) = pattern.find(text) {
                return Some(PHONE_SEPARATOR_RE.replace_all(m.as_str(), "").into_owned());
            }
        }

        INTERNATIONAL_CANDIDATE_RE
            .find_iter(text)
            .find_map(|m| format_if_valid_phone(&PHONE_SEPARATOR_RE.replace_all(m.as_str(), "")))
    }
}

fn format_if_valid_phone(input: &str) -> Option<String> {
    let parsed = phonenumber::parse(None, input).ok()?;
    if !phonenumber::is_valid(&parsed) {
        return None;
    }

    Some(parsed.format().mode(phonenumber::Mode::E164).to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub given: String,
    pub family: String,
}

impl PersonName {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_NAME, UNKNOWN_NAME)
    }
}

/// One way of guessing a name; `NameExtractor` tries them in order.
pub trait NameStrategy: Send + Sync {
    fn label(&self) -> &'static str;

    fn guess(&self, text: &str, ctx: &ExtractionContext<'_>) -> Option<PersonName>;
}

/// `Nom:` and `Prénom:` (or English equivalents) both present, or a single
/// name label followed by two tokens.
pub struct LabelledFieldStrategy;

impl NameStrategy for LabelledFieldStrategy {
    fn label(&self) -> &'static str {
        "labelled-field"
    }

    fn guess(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<PersonName> {
        let given = GIVEN_LABEL_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        let family = FAMILY_LABEL_RE
            .captures_iter(text)
            .filter(|c| c.get(1).is_none())
            .find_map(|c| c.get(2))
            .map(|m| m.as_str());

        if let (Some(given), Some(family)) = (given, family) {
            return Some(PersonName::new(given, family));
        }

        if let Some(c) = FAMILY_FIRST_FULL_NAME_RE.captures(text) {
            return Some(PersonName::new(&c[2], &c[1]));
        }

        if let Some(c) = GIVEN_FIRST_FULL_NAME_RE.captures(text) {
            return Some(PersonName::new(&c[1], &c[2]));
        }

        // `Nom: Diallo Amadou`: family name first.
        BARE_NAME_LABEL_RE
            .captures_iter(text)
            .filter(|c| c.get(1).is_none() && !is_label_word(&c[3]))
            .map(|c| PersonName::new(&c[3], &c[2]))
            .next()
    }
}

/// `traore.amadou@…` → family Traore, given Amadou.
pub struct EmailDerivedStrategy;

impl NameStrategy for EmailDerivedStrategy {
    fn label(&self) -> &'static str {
        "email-derived"
    }

    fn guess(&self, _text: &str, ctx: &ExtractionContext<'_>) -> Option<PersonName> {
        let local = ctx.email?.split('@').next()?;
        let segments: Vec<String> = EMAIL_LOCAL_SPLIT_RE
            .split(local)
            .map(|s| s.chars().filter(|c| c.is_alphabetic()).collect::<String>())
            .filter(|s| !s.is_empty())
            .map(|s| capitalize(&s))
            .collect();

        if segments.len() < 2 {
            return None;
        }

        Some(PersonName::new(segments[1..].join(" "), segments[0].clone()))
    }
}

pub struct EntityRecognitionStrategy {
    recognizer: Arc<dyn EntityRecognizer>,
}

impl EntityRecognitionStrategy {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }
}

impl NameStrategy for EntityRecognitionStrategy {
    fn label(&self) -> &'static str {
        "named-entity"
    }

    fn guess(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<PersonName> {
        let entity = self.recognizer.person_entities(text).into_iter().next()?;
        let (given, family) = entity.trim().split_once(char::is_whitespace)?;
        let family = family.trim();
        if family.is_empty() {
            return None;
        }
        Some(PersonName::new(given, family))
    }
}

/// First two consecutive capitalized words in the leading lines of the raw text.
pub struct CapitalizationStrategy {
    excluded: HashSet<String>,
}

impl CapitalizationStrategy {
    pub fn new(title_words: &[String]) -> Self {
        let excluded = title_words
            .iter()
            .map(|w| w.to_lowercase())
            .chain(LABEL_WORDS.iter().map(|w| w.to_string()))
            .collect();
        Self { excluded }
    }

    fn is_candidate(&self, token: &str) -> bool {
        is_capitalized_word(token) && !self.excluded.contains(&token.to_lowercase())
    }
}

impl NameStrategy for CapitalizationStrategy {
    fn label(&self) -> &'static str {
        "capitalization"
    }

    fn guess(&self, text: &str, ctx: &ExtractionContext<'_>) -> Option<PersonName> {
        let source = if ctx.raw_text.trim().is_empty() {
            text
        } else {
            ctx.raw_text
        };

        for line in source.lines().take(LEADING_LINES) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let tokens: Vec<&str> = line
                .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '|' | '/'))
                .filter(|t| !t.is_empty())
                .collect();

            if let Some(pair) = tokens
                .windows(2)
                .find(|pair| self.is_candidate(pair[0]) && self.is_candidate(pair[1]))
            {
                return Some(PersonName::new(capitalize(pair[0]), capitalize(pair[1])));
            }
        }

        None
    }
}

/// Fixed-priority chain over name strategies; `None` when every strategy fails.
pub struct NameExtractor {
    strategies: Vec<Box<dyn NameStrategy>>,
}

impl NameExtractor {
    pub fn new(strategies: Vec<Box<dyn NameStrategy>>) -> Self {
        Self { strategies }
    }

    /// Labelled fields, then the email address, then NER, then capitalization.
    pub fn with_default_chain(recognizer: Arc<dyn EntityRecognizer>, title_words: &[String]) -> Self {
        Self::new(vec![
            Box::new(LabelledFieldStrategy),
            Box::new(EmailDerivedStrategy),
            Box::new(EntityRecognitionStrategy::new(recognizer)),
            Box::new(CapitalizationStrategy::new(title_words)),
        ])
    }
}

impl FieldExtractor for NameExtractor {
    type Value = PersonName;

    fn extract(&self, text: &str, ctx: &ExtractionContext<'_>) -> Option<PersonName> {
        self.strategies.iter().find_map(|strategy| {
            let guess = strategy.guess(text, ctx)?;
            tracing::debug!(strategy = strategy.label(), "name resolved");
            Some(guess)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Ordered city → country lookup; the first city in index order that appears wins.
pub struct LocationExtractor {
    entries: Vec<(GeoEntry, Regex)>,
    default_country: String,
}

impl LocationExtractor {
    pub fn new(geo_index: &[GeoEntry], default_country: &str) -> Result<Self, CoreError> {
        let entries = geo_index
            .iter()
            .filter(|entry| !entry.city.trim().is_empty())
            .map(|entry| Ok((entry.clone(), whole_word_regex(&entry.city)?)))
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self {
            entries,
            default_country: default_country.to_string(),
        })
    }

    pub fn unmatched(&self) -> Location {
        Location {
            city: None,
            country: Some(self.default_country.clone()).filter(|c| !c.trim().is_empty()),
        }
    }
}

impl FieldExtractor for LocationExtractor {
    type Value = Location;

    fn extract(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<Location> {
        self.entries
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(entry, _)| Location {
                city: Some(entry.city.clone()),
                country: Some(entry.country.clone()),
            })
    }
}

pub struct SkillExtractor {
    vocabulary: Vec<(String, Regex)>,
}

impl SkillExtractor {
    /// Vocabulary entries differing only by case collapse onto the first spelling.
    pub fn new(vocabulary: &[String]) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for skill in vocabulary {
            let canonical = skill.trim();
            if canonical.is_empty() || !seen.insert(canonical.to_lowercase()) {
                continue;
            }
            entries.push((canonical.to_string(), whole_word_regex(canonical)?));
        }
        Ok(Self {
            vocabulary: entries,
        })
    }
}

impl FieldExtractor for SkillExtractor {
    type Value = BTreeSet<String>;

    fn extract(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<BTreeSet<String>> {
        Some(
            self.vocabulary
                .iter()
                .filter(|(_, regex)| regex.is_match(text))
                .map(|(name, _)| name.clone())
                .collect(),
        )
    }
}

/// Case-insensitive match of `term` not glued to other letters, digits or `_`.
///
/// Plain `\b` would fail on terms ending in punctuation such as `C++`.
pub fn whole_word_regex(term: &str) -> Result<Regex, CoreError> {
    let body = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let pattern = format!(r"(?i)(?:^|[^\p{{L}}\p{{N}}_]){body}(?:$|[^\p{{L}}\p{{N}}_])");
    Regex::new(&pattern)
        .map_err(|err| CoreError::Configuration(format!("invalid term {term:?}: {err}")))
}

fn is_label_word(token: &str) -> bool {
    LABEL_WORDS.contains(&token.to_lowercase().as_str())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Every extractor the assembler runs, built once from settings.
pub struct FieldExtractors {
    pub email: EmailExtractor,
    pub phone: PhoneExtractor,
    pub name: NameExtractor,
    pub location: LocationExtractor,
    pub skills: SkillExtractor,
}

impl FieldExtractors {
    pub fn from_settings(
        settings: &RuntimeSettings,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            email: EmailExtractor,
            phone: PhoneExtractor::new(&settings.phone_patterns)?,
            name: NameExtractor::with_default_chain(recognizer, &settings.title_words),
            location: LocationExtractor::new(&settings.geo_index, &settings.default_country)?,
            skills: SkillExtractor::new(&settings.skill_vocabulary)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ner::GazetteerRecognizer;

    fn ctx<'a>(raw_text: &'a str, email: Option<&'a str>) -> ExtractionContext<'a> {
        ExtractionContext { raw_text, email }
    }

    fn default_extractors() -> FieldExtractors {
        let settings = RuntimeSettings::default();
        let recognizer = Arc::new(GazetteerRecognizer::new(
            &settings.given_name_lexicon,
            &settings.title_words,
        ));
        FieldExtractors::from_settings(&settings, recognizer).unwrap()
    }

    #[test]
    fn extract_email_lowercases_first_match() {
        let none = ExtractionContext::default();
        assert_eq!(
            EmailExtractor.extract("Mail: Jane.Doe@Example.COM ou autre@x.fr", &none),
            Some("jane.doe@example.com".to_string())
        );
        assert_eq!(
            EmailExtractor.extract("contact user@[192.168.1.20] today", &none),
            Some("user@[192.168.1.20]".to_string())
        );
        assert_eq!(
            EmailExtractor.extract("jean.martin@firma.fr, Tel", &none),
            Some("jean.martin@firma.fr".to_string())
        );
        assert_eq!(EmailExtractor.extract("no address @ here", &none), None);
    }

    #[test]
    fn extract_phone_prefers_international_then_national() {
        let extractors = default_extractors();
        let none = ExtractionContext::default();

        assert_eq!(
            extractors.phone.extract("Tel: 06 12 34 56 78", &none),
            Some("0612345678".to_string())
        );
        assert_eq!(
            extractors
                .phone
                .extract("Fixe 02-12-34-56-78 / Mobile +222 22 33 44 55", &none),
            Some("+22222334455".to_string())
        );
        assert_eq!(
            extractors.phone.extract("00222 46.12.34.56", &none),
            Some("0022246123456".to_string())
        );
        assert_eq!(extractors.phone.extract("Code postal 12345", &none), None);
    }

    #[test]
    fn labelled_fields_beat_email_derived_name() {
        let extractors = default_extractors();
        let text = "Nom: Diallo Prénom: Amadou Email: a.traore@mail.com";
        let name = extractors
            .name
            .extract(text, &ctx(text, Some("a.traore@mail.com")))
            .unwrap();
        assert_eq!(name, PersonName::new("Amadou", "Diallo"));
    }

    #[test]
    fn labelled_fields_need_a_complete_name() {
        let text = "First Name: Marie Email: x";
        assert_eq!(LabelledFieldStrategy.guess(text, &ctx(text, None)), None);

        let text = "Last name: Curie First name: Marie";
        assert_eq!(
            LabelledFieldStrategy.guess(text, &ctx(text, None)),
            Some(PersonName::new("Marie", "Curie"))
        );

        let text = "Nom et prénom: Diallo Amadou";
        assert_eq!(
            LabelledFieldStrategy.guess(text, &ctx(text, None)),
            Some(PersonName::new("Amadou", "Diallo"))
        );

        let text = "Full name: Amadou Diallo";
        assert_eq!(
            LabelledFieldStrategy.guess(text, &ctx(text, None)),
            Some(PersonName::new("Amadou", "Diallo"))
        );
    }

    #[test]
    fn single_name_label_with_two_tokens_is_family_first() {
        let extractors = default_extractors();
        let text = "Name: Karim Benali Email: k.benali@firma.fr";
        assert_eq!(
            extractors
                .name
                .extract(text, &ctx(text, Some("k.benali@firma.fr"))),
            Some(PersonName::new("Benali", "Karim"))
        );

        let text = "Nom: Diallo Amadou, Nouakchott";
        assert_eq!(
            LabelledFieldStrategy.guess(text, &ctx(text, None)),
            Some(PersonName::new("Amadou", "Diallo"))
        );

        let text = "Nom: Diallo Prénom: Amadou";
        assert_eq!(
            LabelledFieldStrategy.guess(text, &ctx(text, None)),
            Some(PersonName::new("Amadou", "Diallo"))
        );

        let text = "Nom: Diallo Email: x@y.mr";
        assert_eq!(LabelledFieldStrategy.guess(text, &ctx(text, None)), None);
    }

    #[test]
    fn email_derived_name_needs_two_segments() {
        let strategy = EmailDerivedStrategy;
        assert_eq!(
            strategy.guess("", &ctx("", Some("a.traore@mail.com"))),
            Some(PersonName::new("Traore", "A"))
        );
        assert_eq!(
            strategy.guess("", &ctx("", Some("ould-ahmed_mohamed2024@mail.mr"))),
            Some(PersonName::new("Ahmed Mohamed", "Ould"))
        );
        assert_eq!(strategy.guess("", &ctx("", Some("contact@firma.fr"))), None);
        assert_eq!(strategy.guess("", &ctx("", None)), None);
    }

    #[test]
    fn named_entity_strategy_runs_before_capitalization() {
        let extractors = default_extractors();
        let raw = "CURRICULUM VITAE\nIngénieur Réseaux\nSalma Mint Ahmed\ncontact@firma.mr";
        let text = crate::core::text_normalizer::normalize(raw);
        let name = extractors
            .name
            .extract(&text, &ctx(raw, Some("contact@firma.mr")))
            .unwrap();
        assert_eq!(name, PersonName::new("Salma", "Mint Ahmed"));
    }

    #[test]
    fn capitalization_heuristic_skips_titles_and_labels() {
        let strategy = CapitalizationStrategy::new(&RuntimeSettings::default().title_words);
        let raw = "CV\nDéveloppeur Senior\nEmail: x@y.fr\nKarim BENALI\nNouakchott";
        assert_eq!(
            strategy.guess("", &ctx(raw, None)),
            Some(PersonName::new("Karim", "Benali"))
        );
        assert_eq!(strategy.guess("", &ctx("lowercase only\n06 12", None)), None);
    }

    #[test]
    fn capitalization_heuristic_reads_name_beside_email() {
        let extractors = default_extractors();
        let raw = "Karim Benali - contact@firma.fr";
        let text = crate::core::text_normalizer::normalize(raw);
        assert_eq!(
            extractors
                .name
                .extract(&text, &ctx(raw, Some("contact@firma.fr"))),
            Some(PersonName::new("Karim", "Benali"))
        );
    }

    #[test]
    fn name_chain_falls_through_to_none() {
        let extractors = default_extractors();
        let text = "aucune information utile";
        assert_eq!(extractors.name.extract(text, &ctx(text, None)), None);
    }

    #[test]
    fn location_is_whole_word_and_ordered() {
        let extractors = default_extractors();
        let none = ExtractionContext::default();

        assert_eq!(
            extractors.location.extract("Les Nouakchottois sont accueillants", &none),
            None
        );
        assert_eq!(
            extractors
                .location
                .extract("Basé à Rosso, né à NOUAKCHOTT", &none),
            Some(Location {
                city: Some("Nouakchott".to_string()),
                country: Some("Mauritanie".to_string()),
            })
        );
        assert_eq!(
            extractors.location.unmatched(),
            Location {
                city: None,
                country: Some("Mauritanie".to_string()),
            }
        );
    }

    #[test]
    fn skills_are_deduplicated_and_case_insensitive() {
        let extractors = default_extractors();
        let none = ExtractionContext::default();

        let skills = extractors
            .skills
            .extract("python, Python, PYTHON", &none)
            .unwrap();
        assert_eq!(skills, BTreeSet::from(["Python".to_string()]));

        let skills = extractors
            .skills
            .extract("JavaScript et machine learning, Power BI; Gitlab", &none)
            .unwrap();
        assert_eq!(
            skills,
            BTreeSet::from([
                "JavaScript".to_string(),
                "Machine Learning".to_string(),
                "Power BI".to_string(),
            ])
        );

        assert!(extractors.skills.extract("", &none).unwrap().is_empty());
    }

    #[test]
    fn whole_word_regex_handles_symbols() {
        let cpp = whole_word_regex("C++").unwrap();
        assert!(cpp.is_match("C++, Rust"));
        assert!(!cpp.is_match("ABC++ code"));

        let node = whole_word_regex("Node.js").unwrap();
        assert!(node.is_match("node.js"));
        assert!(!node.is_match("nodexjs"));
    }

    #[test]
    fn duplicate_vocabulary_entries_collapse() {
        let skills = SkillExtractor::new(&["SQL".to_string(), "sql".to_string()]).unwrap();
        let found = skills
            .extract("SQL", &ExtractionContext::default())
            .unwrap();
        assert_eq!(found, BTreeSet::from(["SQL".to_string()]));
    }

    #[test]
    fn invalid_phone_pattern_is_configuration_error() {
        let result = PhoneExtractor::new(&["(unclosed".to_string()]);
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }
}
