//! Collaborator boundaries injected into the controllers
//!
//! Production wires these to `app_drive`; tests use the mockall doubles
//! generated under `cfg(test)`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::EditorsConfig;
use crate::document_model::DocumentModel;
use crate::modal::Modal;
use crate::node::{Document, Node, NodeInput};
use crate::AppError;

/// Resolves file nodes to their backing documents
#[cfg_attr(test, mockall::automock)]
pub trait DocumentLookup: Send + Sync {
    fn get_document_by_id(&self, drive_id: &str, node_id: &str) -> Option<Document>;
}

/// Mutations of the drive tree requested by file items
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrivesContainer: Send + Sync {
    /// Persist a new label for `node`; failures are handled by the container
    fn update_node_name(&self, node: &Node, drive_id: &str);

    /// Submit a node payload tagged with an action
    async fn submit_input(&self, input: NodeInput) -> Result<(), AppError>;
}

/// Drive metadata used for option lists and subtitles
#[cfg_attr(test, mockall::automock)]
pub trait DriveDirectory: Send + Sync {
    fn is_remote_drive(&self, drive_id: &str) -> bool;

    fn remote_url(&self, drive_id: &str) -> Option<String>;

    /// Human readable location of a node (`Drive / Folder`)
    fn readable_item_path(&self, drive_id: &str, node_id: &str) -> String;
}

/// Opens a document on its drive's switchboard
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwitchboardOpener: Send + Sync {
    async fn open(&self, drive_id: &str, document: &Document) -> Result<(), AppError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ModalPresenter: Send + Sync {
    fn show(&self, modal: Modal);
}

#[cfg_attr(test, mockall::automock)]
pub trait Permissions: Send + Sync {
    fn is_allowed_to_create_documents(&self) -> bool;
}

/// Local storage owned by the drive server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageServer: Send + Sync {
    async fn clear_storage(&self) -> Result<(), AppError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait FeatureFlags: Send + Sync {
    fn set_editors_config(&self, editors: EditorsConfig);
}

#[cfg_attr(test, mockall::automock)]
pub trait DocumentModels: Send + Sync {
    /// Every known document model
    fn document_models(&self) -> Vec<DocumentModel>;

    /// Models whose editors are currently enabled
    fn enabled_document_models(&self) -> Vec<DocumentModel>;
}

/// Dependencies of a file item and its command router
#[derive(Clone)]
pub struct FileItemServices {
    documents: Arc<dyn DocumentLookup>,
    drives: Arc<dyn DrivesContainer>,
    directory: Arc<dyn DriveDirectory>,
    switchboard: Arc<dyn SwitchboardOpener>,
    modals: Arc<dyn ModalPresenter>,
    permissions: Arc<dyn Permissions>,
}

impl FileItemServices {
    pub fn new(
        documents: Arc<dyn DocumentLookup>,
        drives: Arc<dyn DrivesContainer>,
        directory: Arc<dyn DriveDirectory>,
        switchboard: Arc<dyn SwitchboardOpener>,
        modals: Arc<dyn ModalPresenter>,
        permissions: Arc<dyn Permissions>,
    ) -> Self {
        Self {
            documents,
            drives,
            directory,
            switchboard,
            modals,
            permissions,
        }
    }

    pub fn documents(&self) -> &dyn DocumentLookup {
        self.documents.as_ref()
    }

    pub fn drives(&self) -> &dyn DrivesContainer {
        self.drives.as_ref()
    }

    pub fn directory(&self) -> &dyn DriveDirectory {
        self.directory.as_ref()
    }

    pub fn switchboard(&self) -> &dyn SwitchboardOpener {
        self.switchboard.as_ref()
    }

    pub fn modals(&self) -> &dyn ModalPresenter {
        self.modals.as_ref()
    }

    pub fn permissions(&self) -> &dyn Permissions {
        self.permissions.as_ref()
    }
}

/// Dependencies of the settings modal
#[derive(Clone)]
pub struct SettingsServices {
    pub models: Arc<dyn DocumentModels>,
    pub flags: Arc<dyn FeatureFlags>,
    pub storage: Arc<dyn StorageServer>,
    pub modals: Arc<dyn ModalPresenter>,
}
