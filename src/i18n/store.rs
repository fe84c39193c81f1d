//! 全セクションで共有するアクティブ言語と翻訳の参照

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use super::{
    Dictionary,
    Language,
};

/// Receiver notified whenever the active language changes.
pub type LanguageReceiver = watch::Receiver<Language>;

/// Holds the dictionary and the active language.
///
/// Cloning shares the same state: every clone sees the same active language
/// and switching through any clone notifies all subscribers.
#[derive(Debug, Clone)]
pub struct LocalizationStore {
    /// Immutable translations
    dictionary: Arc<Dictionary>,
    /// Single writer of the active language
    active: Arc<watch::Sender<Language>>,
}

/// One button of the language toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOption {
    pub language: Language,
    pub flag: &'static str,
    /// Short uppercase label, e.g. `EN`
    pub label: &'static str,
    pub aria_label: &'static str,
    pub pressed: bool,
}

impl LocalizationStore {
    /// Creates a store starting in `initial`.
    #[must_use]
    pub fn new(dictionary: Dictionary, initial: Language) -> Self {
        let (active, _) = watch::channel(initial);
        Self { dictionary: Arc::new(dictionary), active: Arc::new(active) }
    }

    /// Creates a store starting in the dictionary's default language.
    #[must_use]
    pub fn with_default_language(dictionary: Dictionary) -> Self {
        let initial = dictionary.default_language();
        Self::new(dictionary, initial)
    }

    #[must_use]
    pub fn current_language(&self) -> Language {
        *self.active.borrow()
    }

    /// Replaces the active language and notifies subscribers.
    ///
    /// Switching to the language that is already active is a no-op.
    pub fn switch_language(&self, language: Language) {
        let changed = self.active.send_if_modified(|current| {
            if *current == language {
                return false;
            }
            *current = language;
            true
        });

        if changed {
            tracing::debug!(%language, "Switched active language");
        }
    }

    /// Message for `key` in the active language, or `key` itself when the
    /// active language does not translate it.
    #[must_use]
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.translate_in(self.current_language(), key)
    }

    /// Like [`Self::translate`] but for an explicit language.
    #[must_use]
    pub fn translate_in<'a>(&'a self, language: Language, key: &'a str) -> &'a str {
        self.dictionary.lookup(language, key).unwrap_or_else(|| {
            tracing::trace!(%language, key, "Missing translation, falling back to key");
            key
        })
    }

    /// Owned variant of [`Self::translate`].
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.translate(key).to_string()
    }

    /// Subscribes to language changes.
    ///
    /// The receiver starts with the current language marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> LanguageReceiver {
        self.active.subscribe()
    }

    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Toggle model, one option per supported language.
    #[must_use]
    pub fn language_options(&self) -> Vec<LanguageOption> {
        let current = self.current_language();
        Language::ALL
            .into_iter()
            .map(|language| LanguageOption {
                language,
                flag: language.flag(),
                label: match language {
                    Language::En => "EN",
                    Language::Fr => "FR",
                },
                aria_label: language.switch_label(),
                pressed: language == current,
            })
            .collect()
    }
}
