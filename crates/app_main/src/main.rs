//! DriveExplorer - console front end for document drives
//!
//! Main entry point.

mod app;
mod console;
mod shell;

use anyhow::Result;
use app_core::{AppConfig, ConfigStore, I18n};
use app_drive::{DocumentDriveServer, SwitchboardLinkOpener};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging needs the retention setting, so configuration comes first
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });

    let _log_guard = app_log::init(config.general.log_retention_days)?;
    tracing::info!("DriveExplorer starting...");

    let i18n = I18n::with_builtin(&config.general.language);
    if let Some(dir) = &config.general.locales_dir {
        match i18n.load_from_dir(dir) {
            Ok(()) => {
                i18n.set_locale(&config.general.language);
            }
            Err(e) => tracing::warn!("Failed to load translations from {:?}: {}", dir, e),
        }
    }

    let server = match &config.drive.snapshot {
        Some(path) => DocumentDriveServer::from_snapshot(path).or_else(|e| {
            tracing::warn!("Failed to load drive snapshot {:?}: {}", path, e);
            app::demo_server()
        })?,
        None => app::demo_server()?,
    };
    let server = Arc::new(server);

    let config = Arc::new(ConfigStore::with_file(config, AppConfig::config_path()));
    let switchboard = Arc::new(SwitchboardLinkOpener::new(server.clone()));

    app::App::new(config, Arc::new(i18n), server, switchboard).run().await
}
