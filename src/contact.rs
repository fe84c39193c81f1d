//! お問い合わせセクション: 問い合わせフォームと固定の外部リンク

/// Inquiry form validation and submission
mod form;
/// Outbound links
mod links;

pub use form::{
    ContactForm,
    ContactFormState,
    DeliveryError,
    Field,
    FieldError,
    FieldErrorKind,
    Mailer,
    SimulatedMailer,
    SubmissionStatus,
};
pub use links::{
    LinkKind,
    OutboundLink,
    outbound_links,
};
