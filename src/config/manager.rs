//! 設定の保持と差分検出
//!
//! 起動時に `.portfolio.json` を読み込み、以後の更新 (API 経由 / ファイル再読込)
//! ではどのセクションが変わったかを [`SettingsChanges`] で返す。
//! 呼び出し側は変わった部分だけを再マウントする。

use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;

use super::{
    ConfigError,
    SiteSettings,
    loader,
};

/// 更新前後で値が変わった設定セクション
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct SettingsChanges {
    /// `defaultLanguage` (次回起動時にのみ効く)
    pub default_language: bool,
    /// `translationsDir` (辞書は起動時にのみ読み込む)
    pub translations_dir: bool,
    pub typing: bool,
    pub scroll_progress: bool,
    pub stats: bool,
    pub contact: bool,
}

impl SettingsChanges {
    /// `old` から `new` への差分
    #[must_use]
    pub fn between(old: &SiteSettings, new: &SiteSettings) -> Self {
        Self {
            default_language: old.default_language != new.default_language,
            translations_dir: old.translations_dir != new.translations_dir,
            typing: old.typing != new.typing,
            scroll_progress: old.scroll_progress != new.scroll_progress,
            stats: old.stats != new.stats,
            contact: old.contact != new.contact,
        }
    }

    /// 何も変わっていない
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.default_language
            || self.translations_dir
            || self.typing
            || self.scroll_progress
            || self.stats
            || self.contact)
    }

    /// 再起動しないと反映されない変更を含む
    #[must_use]
    pub const fn requires_restart(&self) -> bool {
        self.default_language || self.translations_dir
    }
}

/// 検証済みの現在の設定と、その読み込み元
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定 (常にバリデーション済み)
    current_settings: SiteSettings,

    /// `.portfolio.json` を探すディレクトリ
    site_root: Option<PathBuf>,
}

impl ConfigManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定ファイルを使わずに `settings` をそのまま採用する
    ///
    /// # Errors
    /// バリデーションエラー
    pub fn with_settings(settings: SiteSettings) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        Ok(Self { current_settings: settings, site_root: None })
    }

    /// `site_root` の `.portfolio.json` を読み込む (無ければデフォルト値)
    ///
    /// 失敗した場合は現在の設定もルートも変更しない。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, site_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let settings = Self::read(site_root.as_deref())?;
        tracing::debug!(root = ?site_root, "Site settings loaded");

        self.current_settings = settings;
        self.site_root = site_root;
        Ok(())
    }

    /// 同じルートから設定ファイルを読み直し、差分を返す
    ///
    /// # Errors
    /// [`ConfigManager::load_settings`] と同じ
    pub fn reload(&mut self) -> Result<SettingsChanges, ConfigError> {
        let settings = Self::read(self.site_root.as_deref())?;
        Ok(self.replace(settings))
    }

    /// 設定を差し替え、差分を返す
    ///
    /// # Errors
    /// バリデーションエラー (現在の設定は変更しない)
    pub fn update_settings(
        &mut self,
        new_settings: SiteSettings,
    ) -> Result<SettingsChanges, ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;
        Ok(self.replace(new_settings))
    }

    #[must_use]
    pub const fn get_settings(&self) -> &SiteSettings {
        &self.current_settings
    }

    #[must_use]
    pub fn site_root(&self) -> Option<&Path> {
        self.site_root.as_deref()
    }

    /// ファイルから読み込んで検証する
    fn read(site_root: Option<&Path>) -> Result<SiteSettings, ConfigError> {
        let settings = match site_root {
            Some(root) => loader::load_from_root(root)?.unwrap_or_default(),
            None => SiteSettings::default(),
        };
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        Ok(settings)
    }

    /// 検証済みの設定に差し替える
    fn replace(&mut self, settings: SiteSettings) -> SettingsChanges {
        let changes = SettingsChanges::between(&self.current_settings, &settings);
        self.current_settings = settings;
        tracing::debug!(?changes, "Site settings updated");
        changes
    }
}
