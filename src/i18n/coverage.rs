//! ページが使うキーが実際に翻訳されているかの検査

use serde::Serialize;

use super::{
    Dictionary,
    Language,
};

/// How badly a missing key degrades the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Missing from a non-default language only
    Warning,
    /// Missing from the default language
    Error,
}

/// A used key some language does not translate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingTranslation {
    pub key: String,
    pub language: Language,
    pub severity: Severity,
}

/// Reports every `(key, language)` pair the dictionary cannot resolve.
///
/// Keys missing from the default language break the invariant that every
/// key used by the page exists there and are reported as errors; gaps in
/// other languages only degrade to the raw key and are warnings. Results
/// follow the order of `used_keys`, then language order.
pub fn check_keys<'a, I>(dictionary: &Dictionary, used_keys: I) -> Vec<MissingTranslation>
where
    I: IntoIterator<Item = &'a str>,
{
    let default_language = dictionary.default_language();
    let mut missing = Vec::new();

    for key in used_keys {
        if key.is_empty() {
            continue;
        }

        for language in Language::ALL {
            if dictionary.contains(language, key) {
                continue;
            }

            let severity =
                if language == default_language { Severity::Error } else { Severity::Warning };
            tracing::debug!(key, %language, ?severity, "Translation key not found");
            missing.push(MissingTranslation { key: key.to_string(), language, severity });
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::test_utils::create_dictionary;

    fn dictionary() -> Dictionary {
        create_dictionary(&[("nav.home", "Home"), ("nav.about", "About")], &[("nav.home", "Accueil")])
    }

    #[googletest::test]
    fn fully_translated_keys_pass() {
        let result = check_keys(&dictionary(), ["nav.home"]);

        expect_that!(result.is_empty(), eq(true));
    }

    #[googletest::test]
    fn gap_in_secondary_language_is_warning() {
        let result = check_keys(&dictionary(), ["nav.about"]);

        assert_eq!(
            result,
            vec![MissingTranslation {
                key: "nav.about".to_string(),
                language: Language::Fr,
                severity: Severity::Warning,
            }]
        );
    }

    #[googletest::test]
    fn key_missing_everywhere_is_error_and_warning() {
        let result = check_keys(&dictionary(), ["hero.description"]);

        let severities: Vec<(Language, Severity)> =
            result.iter().map(|m| (m.language, m.severity)).collect();
        assert_eq!(
            severities,
            vec![(Language::En, Severity::Error), (Language::Fr, Severity::Warning)]
        );
    }

    #[googletest::test]
    fn empty_keys_are_skipped() {
        let result = check_keys(&dictionary(), [""]);

        expect_that!(result.is_empty(), eq(true));
    }
}
