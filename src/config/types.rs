use std::path::PathBuf;
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::contact::SimulatedMailer;
use crate::i18n::Language;
use crate::visibility::{
    CounterOptions,
    ProgressOptions,
    TypingOptions,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "typing.charIntervalMs")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Language active at startup.
    pub default_language: Language,

    /// Directory holding `en.json` / `fr.json`.
    /// If unset, the dictionary bundled with the binary is used.
    pub translations_dir: Option<PathBuf>,

    pub typing: TypingConfig,
    pub scroll_progress: ScrollProgressConfig,
    pub stats: StatsConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypingConfig {
    pub char_interval_ms: u64,
    pub cursor_blink_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self { char_interval_ms: 50, cursor_blink_ms: 500 }
    }
}

impl TypingConfig {
    #[must_use]
    pub const fn options(&self) -> TypingOptions {
        TypingOptions {
            char_interval: Duration::from_millis(self.char_interval_ms),
            cursor_blink: Duration::from_millis(self.cursor_blink_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollProgressConfig {
    /// Scroll offset (px) above which the indicator is shown.
    pub visibility_offset: f64,
    /// Coalescing window for scroll/resize events.
    pub frame_interval_ms: u64,
}

impl Default for ScrollProgressConfig {
    fn default() -> Self {
        Self { visibility_offset: 50.0, frame_interval_ms: 16 }
    }
}

impl ScrollProgressConfig {
    #[must_use]
    pub const fn options(&self) -> ProgressOptions {
        ProgressOptions {
            visibility_offset: self.visibility_offset,
            frame_interval: Duration::from_millis(self.frame_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsConfig {
    pub steps: u32,
    pub tick_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { steps: 20, tick_ms: 50 }
    }
}

impl StatsConfig {
    #[must_use]
    pub const fn options(&self) -> CounterOptions {
        CounterOptions { steps: self.steps, tick: Duration::from_millis(self.tick_ms) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactConfig {
    /// Minimum message length, in characters.
    pub min_message_length: usize,
    /// Latency of the simulated delivery.
    pub submit_delay_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self { min_message_length: 20, submit_delay_ms: 1500 }
    }
}

impl ContactConfig {
    #[must_use]
    pub const fn mailer(&self) -> SimulatedMailer {
        SimulatedMailer { latency: Duration::from_millis(self.submit_delay_ms) }
    }
}

impl SiteSettings {
    /// # Errors
    /// - Zero interval or step count
    /// - Negative or non-finite visibility offset
    /// - Zero minimum message length
    /// - Empty translations directory
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(dir) = &self.translations_dir
            && dir.as_os_str().is_empty()
        {
            errors.push(ValidationError::new(
                "translationsDir",
                "The directory cannot be empty. Please specify a path (e.g., \"locales\"), or remove this field",
            ));
        }

        for (field_path, value) in [
            ("typing.charIntervalMs", self.typing.char_interval_ms),
            ("typing.cursorBlinkMs", self.typing.cursor_blink_ms),
            ("scrollProgress.frameIntervalMs", self.scroll_progress.frame_interval_ms),
            ("stats.tickMs", self.stats.tick_ms),
        ] {
            if value == 0 {
                errors.push(ValidationError::new(
                    field_path,
                    "The interval must be greater than 0 milliseconds",
                ));
            }
        }

        let offset = self.scroll_progress.visibility_offset;
        if !offset.is_finite() || offset < 0.0 {
            errors.push(ValidationError::new(
                "scrollProgress.visibilityOffset",
                format!("The offset must be a non-negative number of pixels, got {offset}"),
            ));
        }

        if self.stats.steps == 0 {
            errors.push(ValidationError::new("stats.steps", "At least one step is required"));
        }

        if self.contact.min_message_length == 0 {
            errors.push(ValidationError::new(
                "contact.minMessageLength",
                "The minimum length must be at least 1 character",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = SiteSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLanguage": "fr", "typing": {"charIntervalMs": 30}}"#;

        let settings: SiteSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_language, eq(Language::Fr));
        assert_that!(settings.typing.char_interval_ms, eq(30));
        assert_that!(settings.typing.cursor_blink_ms, eq(500));
        assert_that!(settings.translations_dir, none());
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: SiteSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings, SiteSettings::default());
        assert_that!(settings.default_language, eq(Language::En));
        assert_that!(settings.stats.steps, eq(20));
        assert_that!(settings.contact.min_message_length, eq(20));
        assert_that!(settings.contact.submit_delay_ms, eq(1500));
        assert_that!(settings.scroll_progress.frame_interval_ms, eq(16));
    }

    #[rstest]
    fn deserialize_unsupported_language() {
        let json = r#"{"defaultLanguage": "de"}"#;

        let result = serde_json::from_str::<SiteSettings>(json);

        assert_that!(result, err(anything()));
    }

    #[rstest]
    fn options_convert_milliseconds() {
        let settings = SiteSettings::default();

        assert_eq!(settings.typing.options(), TypingOptions::default());
        assert_eq!(settings.scroll_progress.options(), ProgressOptions::default());
        assert_eq!(settings.stats.options(), CounterOptions::default());
        assert_eq!(settings.contact.mailer(), SimulatedMailer::default());
    }

    #[rstest]
    #[case::char_interval("typing.charIntervalMs")]
    #[case::cursor_blink("typing.cursorBlinkMs")]
    #[case::frame("scrollProgress.frameIntervalMs")]
    #[case::tick("stats.tickMs")]
    fn validate_zero_interval(#[case] field_path: &str) {
        let mut settings = SiteSettings::default();
        match field_path {
            "typing.charIntervalMs" => settings.typing.char_interval_ms = 0,
            "typing.cursorBlinkMs" => settings.typing.cursor_blink_ms = 0,
            "scrollProgress.frameIntervalMs" => settings.scroll_progress.frame_interval_ms = 0,
            _ => settings.stats.tick_ms = 0,
        }

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq(field_path)),
                field!(ValidationError.message, contains_substring("greater than 0"))
            ]])
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn validate_invalid_visibility_offset(#[case] offset: f64) {
        let settings = SiteSettings {
            scroll_progress: ScrollProgressConfig { visibility_offset: offset, frame_interval_ms: 16 },
            ..SiteSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(
                ValidationError.field_path,
                eq("scrollProgress.visibilityOffset")
            )])
        );
    }

    #[rstest]
    fn validate_empty_translations_dir() {
        let settings =
            SiteSettings { translations_dir: Some(PathBuf::new()), ..SiteSettings::default() };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationsDir")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = SiteSettings {
            stats: StatsConfig { steps: 0, tick_ms: 50 },
            contact: ContactConfig { min_message_length: 0, submit_delay_ms: 0 },
            ..SiteSettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. stats.steps"));
        assert_that!(error_message, contains_substring("At least one step"));
        assert_that!(error_message, contains_substring("2. contact.minMessageLength"));
    }
}
