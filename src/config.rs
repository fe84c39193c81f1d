//! サイト設定 (`.portfolio.json`) の型・読み込み・管理
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use manager::{
    ConfigManager,
    SettingsChanges,
};
pub use types::{
    ConfigError,
    ContactConfig,
    ScrollProgressConfig,
    SiteSettings,
    StatsConfig,
    TypingConfig,
    ValidationError,
};
