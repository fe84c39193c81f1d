//! ポートフォリオページのヘッドレス描画
//!
//! 指定ディレクトリ (省略時はカレント) の `.portfolio.json` を読み込み、
//! 全セクションをマウントしてイントロアニメーションを再生し、
//! ページのスナップショットを JSON で標準出力に書き出す。

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use portfolio_site::Site;
use portfolio_site::config::ConfigManager;
use portfolio_site::i18n::Dictionary;
use portfolio_site::site::SectionLayout;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

/// Height of one stacked section in the headless layout
const SECTION_HEIGHT: f64 = 1000.0;

/// Long enough for the subtitle and every hero counter to finish
const INTRO: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let site_root = std::env::args_os().nth(1).map_or_else(|| PathBuf::from("."), PathBuf::from);

    let mut config_manager = ConfigManager::new();
    if let Err(error) = config_manager.load_settings(Some(site_root)) {
        tracing::error!("{error}");
        return ExitCode::FAILURE;
    }
    let settings = config_manager.get_settings();

    let dictionary = match &settings.translations_dir {
        Some(dir) => Dictionary::load_dir(dir, settings.default_language),
        None => Dictionary::builtin(),
    };
    let dictionary = match dictionary {
        Ok(dictionary) => dictionary,
        Err(error) => {
            tracing::error!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let mut site = Site::new(config_manager, dictionary);
    site.mount_sections(&SectionLayout::stacked(SECTION_HEIGHT));
    site.advance(INTRO);

    for missing in site.missing_translations() {
        tracing::warn!(key = %missing.key, language = %missing.language, severity = ?missing.severity, "Untranslated key");
    }

    let snapshot = match serde_json::to_vec_pretty(&site.snapshot()) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            tracing::error!("Failed to serialize snapshot: {error}");
            return ExitCode::FAILURE;
        }
    };
    site.unmount();

    let mut stdout = tokio::io::stdout();
    let written = async {
        stdout.write_all(&snapshot).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await
    };
    if let Err(error) = written.await {
        tracing::error!("Failed to write snapshot: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
