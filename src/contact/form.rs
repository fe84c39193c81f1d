//! プロジェクト問い合わせフォーム
//!
//! バリデーションはローカルのみ。送信は [`Mailer`] 経由で行い、
//! 既定の [`SimulatedMailer`] は待機して成功を返すだけ。

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// `something@domain.tld` without whitespace.
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Values typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub company: String,
    pub project_type: String,
    pub budget: String,
    pub message: String,
    pub timeline: String,
}

/// Form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Company,
    ProjectType,
    Budget,
    Message,
    Timeline,
}

impl Field {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Email,
        Self::Company,
        Self::ProjectType,
        Self::Budget,
        Self::Message,
        Self::Timeline,
    ];

    /// Input name, as submitted.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::ProjectType => "projectType",
            Self::Budget => "budget",
            Self::Message => "message",
            Self::Timeline => "timeline",
        }
    }

    /// Translation key of the input label.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Name => "contact.form.name",
            Self::Email => "contact.form.email",
            Self::Company => "contact.form.company",
            Self::ProjectType => "contact.form.projectType",
            Self::Budget => "contact.form.budget",
            Self::Message => "contact.form.message",
            Self::Timeline => "contact.form.timeline",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    #[error("is required")]
    Required,
    #[error("is not a valid email address")]
    InvalidEmail,
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
}

impl FieldErrorKind {
    /// Translation key of the inline message.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::Required => "contact.form.errors.required",
            Self::InvalidEmail => "contact.form.errors.email",
            Self::TooShort { .. } => "contact.form.errors.tooShort",
        }
    }
}

/// Validation failure shown next to one input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Field '{field}' {kind}")]
pub struct FieldError {
    pub field: Field,
    pub kind: FieldErrorKind,
}

impl FieldError {
    #[must_use]
    pub const fn new(field: Field, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }
}

impl ContactForm {
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Company => &self.company,
            Field::ProjectType => &self.project_type,
            Field::Budget => &self.budget,
            Field::Message => &self.message,
            Field::Timeline => &self.timeline,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Company => &mut self.company,
            Field::ProjectType => &mut self.project_type,
            Field::Budget => &mut self.budget,
            Field::Message => &mut self.message,
            Field::Timeline => &mut self.timeline,
        }
    }

    /// Whether every input is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|field| self.value(field).is_empty())
    }

    /// # Errors
    /// - `name` is blank
    /// - `email` is blank or does not look like an address
    /// - `message` is blank or shorter than `min_message_length` characters
    pub fn validate(&self, min_message_length: usize) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new(Field::Name, FieldErrorKind::Required));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new(Field::Email, FieldErrorKind::Required));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new(Field::Email, FieldErrorKind::InvalidEmail));
        }

        let message_length = self.message.trim().chars().count();
        if message_length == 0 {
            errors.push(FieldError::new(Field::Message, FieldErrorKind::Required));
        } else if message_length < min_message_length {
            errors.push(FieldError::new(
                Field::Message,
                FieldErrorKind::TooShort { min: min_message_length },
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn is_valid_email(email: &str) -> bool {
    matches_email(EMAIL_PATTERN.as_ref(), email)
}

/// Checks `email` against `pattern`, or by shape when no pattern compiled:
/// one `@`, no whitespace, a dot in the domain.
fn matches_email(pattern: Option<&Regex>, email: &str) -> bool {
    pattern.map_or_else(
        || {
            !email.contains(char::is_whitespace)
                && email.split_once('@').is_some_and(|(local, domain)| {
                    !local.is_empty()
                        && !domain.contains('@')
                        && domain
                            .split_once('.')
                            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                })
        },
        |pattern| pattern.is_match(email),
    )
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Message rejected: {0}")]
    Rejected(String),
    #[error("Mail service unavailable")]
    Unavailable,
}

/// Delivers a validated inquiry.
#[allow(async_fn_in_trait)]
pub trait Mailer {
    async fn deliver(&self, form: &ContactForm) -> Result<(), DeliveryError>;
}

/// Waits for `latency` and reports success. No message leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedMailer {
    pub latency: Duration,
}

impl Default for SimulatedMailer {
    fn default() -> Self {
        Self { latency: Duration::from_millis(1500) }
    }
}

impl Mailer for SimulatedMailer {
    async fn deliver(&self, form: &ContactForm) -> Result<(), DeliveryError> {
        tracing::debug!(latency = ?self.latency, project_type = %form.project_type, "Simulating delivery");
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "error")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

impl SubmissionStatus {
    /// Translation key of the banner shown for this status, if any.
    #[must_use]
    pub const fn message_key(&self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Submitting => Some("contact.form.sending"),
            Self::Succeeded => Some("contact.form.success"),
            Self::Failed(_) => Some("contact.form.error"),
        }
    }
}

/// Form values plus the inline errors and submission status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFormState {
    form: ContactForm,
    errors: Vec<FieldError>,
    status: SubmissionStatus,
    min_message_length: usize,
}

impl Default for ContactFormState {
    fn default() -> Self {
        Self::new(20)
    }
}

impl ContactFormState {
    #[must_use]
    pub fn new(min_message_length: usize) -> Self {
        Self {
            form: ContactForm::default(),
            errors: Vec::new(),
            status: SubmissionStatus::Idle,
            min_message_length,
        }
    }

    /// Applies a new minimum message length to later submissions.
    pub const fn set_min_message_length(&mut self, min_message_length: usize) {
        self.min_message_length = min_message_length;
    }

    /// Updates one input and clears its inline error.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.form.value_mut(field) = value.into();
        self.errors.retain(|error| error.field != field);
    }

    #[must_use]
    pub const fn form(&self) -> &ContactForm {
        &self.form
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Inline error of `field`, if any.
    #[must_use]
    pub fn error_for(&self, field: Field) -> Option<FieldErrorKind> {
        self.errors.iter().find(|error| error.field == field).map(|error| error.kind)
    }

    #[must_use]
    pub const fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Validates and, when valid, delivers the form through `mailer`.
    ///
    /// Invalid input records the inline errors and leaves the status alone.
    /// A successful delivery clears every input.
    pub async fn submit<M: Mailer>(&mut self, mailer: &M) -> &SubmissionStatus {
        if let Err(errors) = self.form.validate(self.min_message_length) {
            tracing::debug!(count = errors.len(), "Contact form rejected by validation");
            self.errors = errors;
            return &self.status;
        }

        self.errors.clear();
        self.status = SubmissionStatus::Submitting;

        match mailer.deliver(&self.form).await {
            Ok(()) => {
                tracing::info!("Contact form submitted");
                self.form = ContactForm::default();
                self.status = SubmissionStatus::Succeeded;
            }
            Err(error) => {
                tracing::warn!(%error, "Contact form delivery failed");
                self.status = SubmissionStatus::Failed(error.to_string());
            }
        }
        &self.status
    }
}
