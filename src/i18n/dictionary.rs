//! 2 言語の翻訳辞書

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use super::Language;

/// Built-in English messages.
const EN_JSON: &str = include_str!("../../locales/en.json");
/// Built-in French messages.
const FR_JSON: &str = include_str!("../../locales/fr.json");

/// Separator joining nested JSON keys.
pub const KEY_SEPARATOR: &str = ".";

/// Errors raised while building a [`Dictionary`].
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read translation file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {language} translations: {source}")]
    Parse {
        language: Language,
        #[source]
        source: serde_json::Error,
    },

    #[error("{language} translations must be a JSON object at the top level")]
    NotAnObject { language: Language },
}

/// Immutable mapping from language to flattened `key -> message` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    /// Language whose key set is authoritative.
    default_language: Language,
    /// Messages per language.
    entries: HashMap<Language, HashMap<String, String>>,
}

impl Dictionary {
    /// Builds a dictionary from already flattened tables.
    #[must_use]
    pub fn new(
        default_language: Language,
        entries: HashMap<Language, HashMap<String, String>>,
    ) -> Self {
        Self { default_language, entries }
    }

    /// The dictionary shipped with the site.
    ///
    /// # Errors
    /// Only if the embedded JSON is malformed.
    pub fn builtin() -> Result<Self, DictionaryError> {
        let mut entries = HashMap::new();
        entries.insert(Language::En, parse_messages(Language::En, EN_JSON)?);
        entries.insert(Language::Fr, parse_messages(Language::Fr, FR_JSON)?);
        Ok(Self { default_language: Language::En, entries })
    }

    /// Loads `<code>.json` for every supported language from `dir`.
    ///
    /// A missing file leaves that language empty, so every lookup in it
    /// falls back to the raw key.
    ///
    /// # Errors
    /// Read failures other than "not found", and malformed JSON.
    pub fn load_dir(dir: &Path, default_language: Language) -> Result<Self, DictionaryError> {
        let mut entries = HashMap::new();

        for language in Language::ALL {
            let path = dir.join(format!("{}.json", language.code()));
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!("Translation file not found: {:?}", path);
                    entries.insert(language, HashMap::new());
                    continue;
                }
                Err(source) => {
                    return Err(DictionaryError::Io {
                        path: path.display().to_string(),
                        source,
                    });
                }
            };

            let messages = parse_messages(language, &content)?;
            tracing::debug!(%language, keys = messages.len(), "Loaded translations from {:?}", path);
            entries.insert(language, messages);
        }

        Ok(Self { default_language, entries })
    }

    #[must_use]
    pub const fn default_language(&self) -> Language {
        self.default_language
    }

    /// Looks up `key` in `language`. Empty messages count as missing.
    #[must_use]
    pub fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        self.entries
            .get(&language)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
            .filter(|message| !message.is_empty())
    }

    #[must_use]
    pub fn contains(&self, language: Language, key: &str) -> bool {
        self.lookup(language, key).is_some()
    }

    /// Sorted keys defined for `language`.
    #[must_use]
    pub fn keys(&self, language: Language) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .get(&language)
            .map(|messages| messages.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// Keys of the default language that `language` does not translate.
    #[must_use]
    pub fn missing_keys(&self, language: Language) -> Vec<&str> {
        self.keys(self.default_language)
            .into_iter()
            .filter(|key| !self.contains(language, key))
            .collect()
    }
}

/// Parses one language file into a flat table.
fn parse_messages(
    language: Language,
    content: &str,
) -> Result<HashMap<String, String>, DictionaryError> {
    let json: Value = serde_json::from_str(content)
        .map_err(|source| DictionaryError::Parse { language, source })?;

    if !json.is_object() {
        return Err(DictionaryError::NotAnObject { language });
    }

    Ok(flatten_json(&json, KEY_SEPARATOR, None))
}

/// Flatten nested JSON object into dot-separated key map.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use portfolio_site::i18n::flatten_json;
///
/// let json = json!({
///     "nav": {
///         "home": "Home",
///         "about": "About"
///     }
/// });
///
/// let flattened = flatten_json(&json, ".", None);
/// assert_eq!(flattened.get("nav.home"), Some(&"Home".to_string()));
/// assert_eq!(flattened.get("nav.about"), Some(&"About".to_string()));
/// ```
#[must_use]
pub fn flatten_json(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
) -> HashMap<String, String> {
    let mut result = HashMap::new();
    flatten_json_value(json, separator, prefix, &mut result);
    result
}

/// Recursive step of [`flatten_json`].
fn flatten_json_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut HashMap<String, String>,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), json.to_string());
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::create_dictionary;

    #[googletest::test]
    fn builtin_has_both_languages() {
        let dictionary = Dictionary::builtin().unwrap();

        expect_that!(dictionary.lookup(Language::En, "nav.home"), some(eq("Home")));
        expect_that!(dictionary.lookup(Language::Fr, "nav.home"), some(eq("Accueil")));
        expect_that!(dictionary.default_language(), eq(Language::En));
    }

    #[googletest::test]
    fn builtin_keeps_dotted_leaf_next_to_parent() {
        let dictionary = Dictionary::builtin().unwrap();

        expect_that!(dictionary.lookup(Language::En, "contact.location"), some(eq("Location")));
        expect_that!(
            dictionary.lookup(Language::En, "contact.location.value"),
            some(eq("Dakar, Senegal"))
        );
        expect_that!(
            dictionary.lookup(Language::Fr, "contact.location.value"),
            some(eq("Dakar, Sénégal"))
        );
    }

    #[googletest::test]
    fn builtin_languages_have_same_keys() {
        let dictionary = Dictionary::builtin().unwrap();

        assert!(dictionary.missing_keys(Language::Fr).is_empty());
        assert_eq!(dictionary.keys(Language::En), dictionary.keys(Language::Fr));
    }

    #[googletest::test]
    fn empty_message_counts_as_missing() {
        let mut en = HashMap::new();
        en.insert("a".to_string(), String::new());
        en.insert("b".to_string(), "B".to_string());
        let dictionary = Dictionary::new(Language::En, HashMap::from([(Language::En, en)]));

        expect_that!(dictionary.lookup(Language::En, "a"), none());
        expect_that!(dictionary.lookup(Language::En, "b"), some(eq("B")));
        expect_that!(dictionary.lookup(Language::Fr, "b"), none());
    }

    #[googletest::test]
    fn missing_keys_lists_untranslated_default_keys() {
        let dictionary = create_dictionary(
            &[("nav.home", "Home"), ("nav.about", "About")],
            &[("nav.home", "Accueil")],
        );

        assert_eq!(dictionary.missing_keys(Language::Fr), vec!["nav.about"]);
        assert!(dictionary.missing_keys(Language::En).is_empty());
    }

    #[googletest::test]
    fn load_dir_reads_language_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("en.json"), r#"{"nav": {"home": "Start"}}"#).unwrap();
        fs::write(temp_dir.path().join("fr.json"), r#"{"nav": {"home": "Début"}}"#).unwrap();

        let dictionary = Dictionary::load_dir(temp_dir.path(), Language::En).unwrap();

        expect_that!(dictionary.lookup(Language::En, "nav.home"), some(eq("Start")));
        expect_that!(dictionary.lookup(Language::Fr, "nav.home"), some(eq("Début")));
    }

    #[googletest::test]
    fn load_dir_missing_file_leaves_language_empty() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("en.json"), r#"{"nav": {"home": "Home"}}"#).unwrap();

        let dictionary = Dictionary::load_dir(temp_dir.path(), Language::En).unwrap();

        assert!(dictionary.keys(Language::Fr).is_empty());
        assert_eq!(dictionary.missing_keys(Language::Fr), vec!["nav.home"]);
    }

    #[googletest::test]
    fn load_dir_rejects_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("en.json"), "invalid json").unwrap();

        let result = Dictionary::load_dir(temp_dir.path(), Language::En);

        assert!(matches!(result, Err(DictionaryError::Parse { language: Language::En, .. })));
    }

    #[googletest::test]
    fn load_dir_rejects_non_object_root() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("fr.json"), r#"["a", "b"]"#).unwrap();

        let result = Dictionary::load_dir(temp_dir.path(), Language::En);

        assert!(matches!(result, Err(DictionaryError::NotAnObject { language: Language::Fr })));
    }

    #[googletest::test]
    fn flatten_json_nested() {
        let json = json!({
            "projects": {
                "hemap": {
                    "title": "HeMAP Migration"
                }
            },
            "common": {
                "impact": "Impact"
            }
        });

        let result = flatten_json(&json, ".", None);

        expect_that!(result.get("projects.hemap.title"), some(eq(&"HeMAP Migration".to_string())));
        expect_that!(result.get("common.impact"), some(eq(&"Impact".to_string())));
        expect_that!(result.len(), eq(2));
    }

    #[googletest::test]
    fn flatten_json_with_array_and_scalars() {
        let json = json!({
            "stack": ["DHIS2", "AWS"],
            "years": 9,
            "remote": true
        });

        let result = flatten_json(&json, ".", None);

        expect_that!(result.get("stack[0]"), some(eq(&"DHIS2".to_string())));
        expect_that!(result.get("stack[1]"), some(eq(&"AWS".to_string())));
        expect_that!(result.get("years"), some(eq(&"9".to_string())));
        expect_that!(result.get("remote"), some(eq(&"true".to_string())));
    }
}
