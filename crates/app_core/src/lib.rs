//! DriveExplorer Core Domain Logic
//!
//! This crate contains:
//! - Drive nodes, documents and context-menu options
//! - Command routing and the inline rename state machine
//! - File item and settings modal controllers
//! - Collaborator traits implemented by the drive server
//! - Configuration, errors and localization

pub mod node;
pub mod option;
pub mod edit_mode;
pub mod modal;
pub mod services;
pub mod command;
pub mod file_item;
pub mod settings;
pub mod document_model;
pub mod switchboard;
pub mod config;
pub mod error;
pub mod i18n;

pub use node::{decode_drive_id, Document, Node, NodeAction, NodeInput, NodeKind};
pub use option::NodeOption;
pub use edit_mode::{EditMode, EditOutcome};
pub use modal::{ConfirmIntent, ConfirmationModal, DeleteItemModal, Modal};
pub use services::{
    DocumentLookup, DocumentModels, DriveDirectory, DrivesContainer, FeatureFlags,
    FileItemServices, ModalPresenter, Permissions, SettingsServices, StorageServer,
    SwitchboardOpener,
};
pub use command::{CommandRouter, Dispatched};
pub use file_item::{ClickOutcome, FileItem, MenuEntry};
pub use settings::{SettingsModal, SettingsTexts};
pub use document_model::{builtin_models, DocumentModel, DocumentModelCatalog, SelectOption};
pub use switchboard::switchboard_url;
pub use config::{AppConfig, ConfigStore, DriveConfig, EditorsConfig, GeneralConfig};
pub use error::AppError;
pub use i18n::I18n;

/// Permission check backed by the `general.allow_create_documents` setting
pub struct ConfigPermissions {
    config: std::sync::Arc<ConfigStore>,
}

impl ConfigPermissions {
    pub fn new(config: std::sync::Arc<ConfigStore>) -> Self {
        Self { config }
    }
}

impl Permissions for ConfigPermissions {
    fn is_allowed_to_create_documents(&self) -> bool {
        self.config.snapshot().general.allow_create_documents
    }
}
