//! Application configuration

use directories::ProjectDirs;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::services::FeatureFlags;
use crate::AppError;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub editors: EditorsConfig,
    pub drive: DriveConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub language: String,
    /// Directory of additional `<locale>/*.ftl` translations
    pub locales_dir: Option<PathBuf>,
    /// Whether the user may create, rename and duplicate documents
    pub allow_create_documents: bool,
    pub log_retention_days: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            locales_dir: None,
            allow_create_documents: true,
            log_retention_days: 7,
        }
    }
}

/// Feature flags for document-model editors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorsConfig {
    /// Enabled editor ids, `None` enables every editor
    pub enabled_editors: Option<Vec<String>>,
}

impl EditorsConfig {
    pub fn is_enabled(&self, model_id: &str) -> bool {
        self.enabled_editors
            .as_ref()
            .map_or(true, |ids| ids.iter().any(|id| id == model_id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// JSON snapshot of drives loaded at startup
    pub snapshot: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, defaults when the file is missing
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "DriveExplorer", "DriveExplorer")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}

/// Shared, optionally file-backed configuration
pub struct ConfigStore {
    config: RwLock<AppConfig>,
    path: Option<PathBuf>,
}

impl ConfigStore {
    /// Store that persists every change to `path`
    pub fn with_file(config: AppConfig, path: PathBuf) -> Self {
        Self {
            config: RwLock::new(config),
            path: Some(path),
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            config: RwLock::new(config),
            path: None,
        }
    }

    pub fn snapshot(&self) -> AppConfig {
        self.config.read().clone()
    }

    pub fn editors(&self) -> EditorsConfig {
        self.config.read().editors.clone()
    }

    pub fn update<F: FnOnce(&mut AppConfig)>(&self, f: F) -> Result<(), AppError> {
        let snapshot = {
            let mut config = self.config.write();
            f(&mut config);
            config.clone()
        };

        match &self.path {
            Some(path) => snapshot.save_to(path),
            None => Ok(()),
        }
    }
}

impl FeatureFlags for ConfigStore {
    fn set_editors_config(&self, editors: EditorsConfig) {
        if let Err(e) = self.update(|config| config.editors = editors) {
            tracing::error!("Failed to persist editors config: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.general.language, "en");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editors]\nenabled_editors = [\"acme/invoice\"]\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.editors.is_enabled("acme/invoice"));
        assert!(!config.editors.is_enabled("powerhouse/budget-statement"));
        assert!(config.general.allow_create_documents);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general\n").unwrap();

        assert!(matches!(AppConfig::load_from(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_store_persists_editors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let store = ConfigStore::with_file(AppConfig::default(), path.clone());

        store.set_editors_config(EditorsConfig {
            enabled_editors: Some(vec!["acme/invoice".into()]),
        });

        let reloaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.editors.enabled_editors, Some(vec!["acme/invoice".to_string()]));
        assert_eq!(store.editors(), reloaded.editors);
    }

    #[test]
    fn test_unset_enables_all() {
        assert!(EditorsConfig::default().is_enabled("anything"));
        let none = EditorsConfig {
            enabled_editors: Some(Vec::new()),
        };
        assert!(!none.is_enabled("anything"));
    }
}
