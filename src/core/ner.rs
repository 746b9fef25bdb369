use std::collections::HashSet;

/// Named-entity recognition, restricted to the entity type the name chain needs.
pub trait EntityRecognizer: Send + Sync {
    /// Person entities in document order.
    fn person_entities(&self, text: &str) -> Vec<String>;
}

/// Lexicon-driven person recognizer.
///
/// A person entity starts at a known given name and extends over up to two
/// following capitalized tokens that are not job-title words. A known given
/// name with nothing capitalized after it is not an entity.
pub struct GazetteerRecognizer {
    given_names: HashSet<String>,
    title_words: HashSet<String>,
}

const MAX_TRAILING_TOKENS: usize = 2;

impl GazetteerRecognizer {
    pub fn new<I, J>(given_names: I, title_words: J) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        J: IntoIterator,
        J::Item: AsRef<str>,
    {
        Self {
            given_names: given_names
                .into_iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect(),
            title_words: title_words
                .into_iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect(),
        }
    }

    fn is_name_token(&self, token: &str) -> bool {
        is_capitalized_word(token) && !self.title_words.contains(&token.to_lowercase())
    }
}

impl EntityRecognizer for GazetteerRecognizer {
    fn person_entities(&self, text: &str) -> Vec<String> {
        let tokens: Vec<Token<'_>> = text.split_whitespace().map(Token::new).collect();

        let mut entities = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let start = &tokens[i];
            if !self.is_name_token(start.text) || !self.given_names.contains(&start.text.to_lowercase()) {
                i += 1;
                continue;
            }

            let mut end = i;
            while end + 1 < tokens.len()
                && end - i < MAX_TRAILING_TOKENS
                && !tokens[end].closes_clause
                && self.is_name_token(tokens[end + 1].text)
            {
                end += 1;
            }

            if end == i {
                i += 1;
                continue;
            }

            let words: Vec<&str> = tokens[i..=end].iter().map(|t| t.text).collect();
            entities.push(words.join(" "));
            i = end + 1;
        }

        entities
    }
}

struct Token<'a> {
    text: &'a str,
    /// Trailing punctuation such as `,` or `:` ends the entity at this token.
    closes_clause: bool,
}

impl<'a> Token<'a> {
    fn new(raw: &'a str) -> Self {
        let is_edge = |c: char| !c.is_alphanumeric() && c != '-' && c != '\'';
        let text = raw.trim_matches(is_edge);
        Self {
            text,
            closes_clause: raw.ends_with(is_edge),
        }
    }
}

/// `Jean`, `MARTIN`, `Ould-Ahmed`; not `jean`, `J`, `06`.
pub fn is_capitalized_word(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    first.is_uppercase()
        && token.chars().count() >= 2
        && token
            .chars()
            .all(|c| c.is_alphabetic() || c == '-' || c == '\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> GazetteerRecognizer {
        GazetteerRecognizer::new(["jean", "amadou", "mohamed"], ["ingénieur", "consultant"])
    }

    #[test]
    fn finds_person_after_known_given_name() {
        assert_eq!(
            recognizer().person_entities("Ingénieur logiciel, Jean Dupont, Nouakchott"),
            vec!["Jean Dupont".to_string()]
        );
    }

    #[test]
    fn entity_spans_at_most_three_tokens_and_stops_at_titles() {
        assert_eq!(
            recognizer().person_entities("Mohamed Ould Ahmed Salem"),
            vec!["Mohamed Ould Ahmed".to_string()]
        );
        assert_eq!(
            recognizer().person_entities("Amadou Consultant senior"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn lowercase_or_unknown_names_are_ignored() {
        assert!(recognizer().person_entities("jean dupont").is_empty());
        assert!(recognizer().person_entities("Pierre Durand").is_empty());
    }

    #[test]
    fn capitalized_word_rules() {
        assert!(is_capitalized_word("Jean"));
        assert!(is_capitalized_word("MARTIN"));
        assert!(is_capitalized_word("Ould-Ahmed"));
        assert!(is_capitalized_word("Élodie"));
        assert!(!is_capitalized_word("jean"));
        assert!(!is_capitalized_word("J"));
        assert!(!is_capitalized_word("06"));
        assert!(!is_capitalized_word("Tel:"));
    }
}
