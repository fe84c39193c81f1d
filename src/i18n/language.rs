//! 対応している表示言語

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// A language the site can be displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (default)
    #[default]
    En,
    /// French
    Fr,
}

/// Returned when a language code is not one of the supported codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported language code '{0}' (expected one of: en, fr)")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    /// All supported languages, in toggle order.
    pub const ALL: [Self; 2] = [Self::En, Self::Fr];

    /// Two-letter code used for dictionary file names and serialization.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Native name of the language.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fr => "Français",
        }
    }

    /// Flag glyph shown on the toggle button.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::En => "🇺🇸",
            Self::Fr => "🇫🇷",
        }
    }

    /// Accessible label for the button that switches to this language,
    /// written in the target language.
    #[must_use]
    pub const fn switch_label(self) -> &'static str {
        match self {
            Self::En => "Switch to English",
            Self::Fr => "Passer au français",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}
