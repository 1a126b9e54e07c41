//! Application error types

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Collaborator failures (logged by the caller, never fatal) =====
    #[error("Drive not found: {0}")]
    DriveNotFound(String),

    #[error("Node not found: {node_id} in drive {drive_id}")]
    NodeNotFound { drive_id: String, node_id: String },

    #[error("Drive {0} is not a remote drive")]
    NotRemote(String),

    #[error("Invalid switchboard link: {0}")]
    InvalidLink(String),

    #[error("Failed to open link: {0}")]
    Open(String),

    #[error("Copy failed: {0}")]
    Copy(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // ===== Bootstrap failures =====
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Is this error expected to go away on retry?
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Open(_) | AppError::Storage(_) | AppError::Io(_))
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::NodeNotFound { node_id, .. } => format!("Item not found: {}", node_id),
            AppError::NotRemote(_) => "This drive has no switchboard".to_string(),
            AppError::Open(_) => "Could not open the switchboard link".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(e: toml::ser::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(e: url::ParseError) -> Self {
        AppError::InvalidLink(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let err = AppError::NodeNotFound {
            drive_id: "d1".into(),
            node_id: "f1".into(),
        };
        assert_eq!(err.user_message(), "Item not found: f1");
        assert_eq!(err.to_string(), "Node not found: f1 in drive d1");
    }

    #[test]
    fn test_is_transient() {
        assert!(AppError::Open("x".into()).is_transient());
        assert!(!AppError::NotRemote("d1".into()).is_transient());
    }
}
