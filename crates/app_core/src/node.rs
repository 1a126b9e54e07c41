//! Drive tree nodes and the documents behind them

use serde::{Deserialize, Serialize};

/// Kind of a drive tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "folder")]
    Folder,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Folder => "folder",
        }
    }
}

/// File or folder entry in a drive's tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    /// Parent folder id, `None` for top-level entries
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Owning drive
    pub drive_id: String,
    /// Document model type (files only)
    #[serde(default)]
    pub document_type: Option<String>,
}

impl Node {
    pub fn file(id: &str, label: &str, drive_id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: NodeKind::File,
            parent_id: None,
            drive_id: drive_id.to_string(),
            document_type: None,
        }
    }

    pub fn folder(id: &str, label: &str, drive_id: &str) -> Self {
        Self {
            kind: NodeKind::Folder,
            ..Self::file(id, label, drive_id)
        }
    }

    pub fn with_parent(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    pub fn with_document_type(mut self, document_type: &str) -> Self {
        self.document_type = Some(document_type.to_string());
        self
    }

    /// Copy of this node carrying a different label
    pub fn relabeled(&self, label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..self.clone()
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

/// Document backing a file node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub document_type: String,
    #[serde(default)]
    pub revision: u64,
}

/// Action tag attached to a submitted node payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeAction {
    #[serde(rename = "UPDATE_AND_COPY")]
    UpdateAndCopy,
}

impl NodeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeAction::UpdateAndCopy => "UPDATE_AND_COPY",
        }
    }
}

/// Node payload submitted to the drive container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInput {
    pub node: Node,
    pub action: NodeAction,
}

/// Decode a drive reference as it appears in routes (percent-encoded) into a drive id.
///
/// References that are not valid percent-encoded UTF-8 are used verbatim.
pub fn decode_drive_id(drive_ref: &str) -> String {
    match urlencoding::decode(drive_ref) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            tracing::debug!("Drive reference {:?} is not percent-encoded UTF-8: {}", drive_ref, e);
            drive_ref.to_string()
        }
    }
}
