//! portfolio-site
//!
//! バイリンガル (英語/フランス語) ポートフォリオサイトのローカライズストアと
//! スクロール連動の表示エンジン

pub mod config;
pub mod contact;
pub mod i18n;
pub mod interaction;
pub mod scheduler;
pub mod site;
pub mod viewport;
pub mod visibility;

mod test_utils;

pub use i18n::LocalizationStore;
pub use site::Site;
