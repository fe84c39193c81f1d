//! ローカライズ: 英仏の辞書、アクティブ言語のストア、
//! ストアを各セクションに渡すプロバイダースコープ

/// Provider scope
mod context;
/// Key coverage checks
pub mod coverage;
/// Translation tables
mod dictionary;
/// Language codes
mod language;
/// Active-language store
mod store;

pub use context::{
    Context,
    ContextError,
};
pub use dictionary::{
    Dictionary,
    DictionaryError,
    KEY_SEPARATOR,
    flatten_json,
};
pub use language::{
    Language,
    UnsupportedLanguage,
};
pub use store::{
    LanguageOption,
    LanguageReceiver,
    LocalizationStore,
};
