//! 各セクションに渡されるプロバイダースコープ

use thiserror::Error;

use super::LocalizationStore;

/// Raised when a consumer reads a facility its scope was not given.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("{consumer} must be used within a LocalizationStore provider")]
    MissingLocalization { consumer: &'static str },
}

/// Composition context passed explicitly to each section.
///
/// A context without a store models a section mounted outside the provider.
/// Accessing the store from such a context fails immediately.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Store provided by an ancestor, if any
    localization: Option<LocalizationStore>,
}

impl Context {
    /// Context with no providers.
    #[must_use]
    pub const fn empty() -> Self {
        Self { localization: None }
    }

    /// Context providing `store` to every descendant.
    #[must_use]
    pub const fn with_localization(store: LocalizationStore) -> Self {
        Self { localization: Some(store) }
    }

    /// Returns the provided store.
    ///
    /// # Errors
    /// [`ContextError::MissingLocalization`] when no ancestor provided one.
    pub fn localization(&self, consumer: &'static str) -> Result<&LocalizationStore, ContextError> {
        self.localization.as_ref().ok_or(ContextError::MissingLocalization { consumer })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::i18n::{
        Dictionary,
        Language,
    };

    #[googletest::test]
    fn provided_store_is_reachable() {
        let store = LocalizationStore::new(Dictionary::builtin().unwrap(), Language::Fr);
        let context = Context::with_localization(store);

        let store = context.localization("Header").unwrap();

        expect_that!(store.translate("nav.about"), eq("À Propos"));
    }

    #[googletest::test]
    fn missing_provider_fails_at_access() {
        let context = Context::empty();

        let error = context.localization("LanguageToggle").unwrap_err();

        expect_that!(error, eq(ContextError::MissingLocalization { consumer: "LanguageToggle" }));
        expect_that!(
            error.to_string(),
            eq("LanguageToggle must be used within a LocalizationStore provider")
        );
    }

    #[googletest::test]
    fn clones_share_the_provided_store() {
        let store = LocalizationStore::new(Dictionary::builtin().unwrap(), Language::En);
        let parent = Context::with_localization(store);
        let child = parent.clone();

        parent.localization("App").unwrap().switch_language(Language::Fr);

        expect_that!(child.localization("Hero").unwrap().current_language(), eq(Language::Fr));
    }
}
