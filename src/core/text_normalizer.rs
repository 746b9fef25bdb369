use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SEPARATOR_GAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?([@.])(?: (\p{Lu})| )?").unwrap());

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Canonical form used by every field extractor.
///
/// Layout artifacts from PDF text runs and OCR output put spaces inside
/// addresses (`jean . martin @ firma.fr`); those are removed here so the
/// extractors can stay strict. A full stop followed by a capitalized word
/// keeps its space, so `firma.fr. Tel` stays two tokens. Re-normalizing the
/// output is a no-op.
pub fn normalize(text: &str) -> String {
    let collapsed = WHITESPACE_RUN_RE.replace_all(text, " ");
    let joined = SEPARATOR_GAP_RE.replace_all(&collapsed, join_separator);
    expand_ligatures(&joined).trim().to_string()
}

fn join_separator(caps: &Captures<'_>) -> String {
    let separator = &caps[1];
    match caps.get(2) {
        Some(next) if separator == "." => format!(". {}", next.as_str()),
        Some(next) => format!("{separator}{}", next.as_str()),
        None => separator.to_string(),
    }
}

fn expand_ligatures(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match LIGATURES.iter().find(|(ligature, _)| *ligature == c) {
            Some((_, expansion)) => out.push_str(expansion),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_joins_address_parts() {
        assert_eq!(
            normalize("  Contact :\n\tjean . martin @ firma.fr \r\n Tel"),
            "Contact : jean.martin@firma.fr Tel"
        );
        assert_eq!(normalize("a\u{00A0}\u{00A0}b"), "a b");
    }

    #[test]
    fn full_stop_before_capitalized_word_keeps_its_space() {
        assert_eq!(
            normalize("Email: jean.martin@firma.fr. Tel: 06 12"),
            "Email: jean.martin@firma.fr. Tel: 06 12"
        );
        assert_eq!(normalize("J . Martin @ Firma . fr"), "J. Martin@Firma.fr");
        assert_eq!(normalize("firma . fr . tel"), "firma.fr.tel");
    }

    #[test]
    fn normalize_expands_ligatures() {
        assert_eq!(normalize("certi\u{FB01}cation \u{FB02}uent"), "certification fluent");
        assert_eq!(normalize("e\u{FB03}cace"), "efficace");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "plain text",
            "a . . b",
            "x. .y",
            "a @ @ b",
            " @ . ",
            "mail : j . doe @ ex . com\n\n\nNext line",
            "\u{FB01} . \u{FB02}",
            "Nom: Diallo\r\nPrénom:  Amadou\t06 12 34 56 78",
            "..  ..  @@",
            "fr. Tel",
            "a . B . . C",
            "x @ Y. z",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn normalize_is_idempotent_for_arbitrary_text() {
        proptest!(|(text in "\\PC{0,200}")| {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        });
    }

    #[test]
    fn normalize_is_idempotent_around_separators() {
        proptest!(|(text in "[ \t\r\n\u{00A0}@.aBzZ0\u{FB00}-\u{FB06}]{0,64}")| {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once, "input {:?}", text);
        });
    }
}
