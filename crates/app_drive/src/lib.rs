//! DriveExplorer Drive Server
//!
//! Provides the drive side of the explorer:
//! - In-memory drives seeded from JSON snapshots
//! - Node rename, copy and delete
//! - Switchboard links opened in the system browser

mod drive;
mod naming;
mod server;
mod switchboard;

pub use drive::{Drive, DriveInfo, DriveSnapshot};
pub use naming::{copy_label, normalize_label};
pub use server::DocumentDriveServer;
pub use switchboard::{Launcher, SwitchboardLinkOpener};

use std::path::PathBuf;

use app_core::AppError;
use thiserror::Error;

/// Drive server errors
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot not found: {0:?}")]
    SnapshotNotFound(PathBuf),

    #[error("Drive not found: {0}")]
    DriveNotFound(String),

    #[error("Drive already exists: {0}")]
    DriveExists(String),

    #[error("Node not found: {node_id} in drive {drive_id}")]
    NodeNotFound { drive_id: String, node_id: String },

    #[error("Node already exists: {0}")]
    NodeExists(String),

    #[error("Invalid parent folder: {0}")]
    InvalidParent(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Not a file: {0}")]
    NotAFile(String),
}

pub type Result<T> = std::result::Result<T, DriveError>;

impl From<DriveError> for AppError {
    fn from(e: DriveError) -> Self {
        match e {
            DriveError::Io(e) => AppError::Io(e),
            DriveError::DriveNotFound(id) => AppError::DriveNotFound(id),
            DriveError::NodeNotFound { drive_id, node_id } => {
                AppError::NodeNotFound { drive_id, node_id }
            }
            DriveError::NotAFile(_) | DriveError::InvalidName(_) => AppError::Copy(e.to_string()),
            other => AppError::Storage(other.to_string()),
        }
    }
}
