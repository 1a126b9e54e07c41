//! In-memory document drive server

use app_core::{
    AppError, Document, DocumentLookup, DriveDirectory, DrivesContainer, Node, NodeAction,
    NodeInput, StorageServer,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use crate::drive::{Drive, DriveInfo, DriveSnapshot};
use crate::naming::{copy_label, normalize_label};
use crate::{DriveError, Result};

/// Drives held in memory, optionally seeded from a snapshot
#[derive(Default)]
pub struct DocumentDriveServer {
    drives: RwLock<HashMap<String, Drive>>,
}

impl DocumentDriveServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server seeded with the drives of a JSON snapshot
    pub fn from_snapshot(path: &Path) -> Result<Self> {
        let server = Self::new();
        for drive in DriveSnapshot::load(path)?.drives {
            server.add_drive(drive)?;
        }
        Ok(server)
    }

    pub fn snapshot(&self) -> DriveSnapshot {
        let drives = self.drives.read();
        let mut drives: Vec<Drive> = drives.values().cloned().collect();
        drives.sort_by(|a, b| a.info.id.cmp(&b.info.id));
        DriveSnapshot { drives }
    }

    pub fn add_drive(&self, drive: Drive) -> Result<()> {
        let mut drives = self.drives.write();
        if drives.contains_key(&drive.info.id) {
            return Err(DriveError::DriveExists(drive.info.id));
        }

        // Nodes always carry the id of the drive they live in
        let mut drive = drive;
        let drive_id = drive.info.id.clone();
        for node in &mut drive.nodes {
            node.drive_id = drive_id.clone();
        }

        tracing::info!("Added drive {} ({} nodes)", drive_id, drive.nodes.len());
        drives.insert(drive_id, drive);
        Ok(())
    }

    pub fn drives(&self) -> Vec<DriveInfo> {
        let mut infos: Vec<DriveInfo> = self.drives.read().values().map(|d| d.info.clone()).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    pub fn drive_info(&self, drive_id: &str) -> Option<DriveInfo> {
        self.drives.read().get(drive_id).map(|d| d.info.clone())
    }

    /// Add a node, with its document when it is a file
    pub fn add_node(&self, node: Node, document: Option<Document>) -> Result<()> {
        let mut drives = self.drives.write();
        let drive = drives
            .get_mut(&node.drive_id)
            .ok_or_else(|| DriveError::DriveNotFound(node.drive_id.clone()))?;

        if drive.node(&node.id).is_some() {
            return Err(DriveError::NodeExists(node.id));
        }
        if let Some(parent_id) = &node.parent_id {
            if drive.node(parent_id).map_or(true, |p| p.is_file()) {
                return Err(DriveError::InvalidParent(parent_id.clone()));
            }
        }

        if let Some(document) = document {
            drive.documents.insert(node.id.clone(), document);
        }
        drive.nodes.push(node);
        drive.touch();
        Ok(())
    }

    /// Distinct document types across all drives, sorted
    pub fn document_types(&self) -> Vec<String> {
        let drives = self.drives.read();
        let types: BTreeSet<&str> = drives
            .values()
            .flat_map(|d| d.documents.values())
            .map(|doc| doc.document_type.as_str())
            .collect();
        types.into_iter().map(str::to_string).collect()
    }

    pub fn node(&self, drive_id: &str, node_id: &str) -> Option<Node> {
        self.drives.read().get(drive_id).and_then(|d| d.node(node_id).cloned())
    }

    /// Every node of a drive in tree order (folders before their contents)
    pub fn nodes(&self, drive_id: &str) -> Vec<Node> {
        let drives = self.drives.read();
        let Some(drive) = drives.get(drive_id) else {
            return Vec::new();
        };

        let sorted_children = |parent: Option<&str>| {
            let mut children: Vec<&Node> = drive.children(parent).collect();
            children.sort_by(|a, b| a.label.cmp(&b.label));
            children
        };

        let mut ordered: Vec<Node> = Vec::with_capacity(drive.nodes.len());
        let mut stack: Vec<&Node> = sorted_children(None).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            ordered.push(node.clone());
            if ordered.len() > drive.nodes.len() {
                tracing::warn!("Parent cycle in drive {}", drive_id);
                break;
            }
            stack.extend(sorted_children(Some(&node.id)).into_iter().rev());
        }

        // Orphans (missing parent) go last
        let visited: HashSet<String> = ordered.iter().map(|n| n.id.clone()).collect();
        ordered.extend(drive.nodes.iter().filter(|n| !visited.contains(&n.id)).cloned());
        ordered
    }

    pub fn rename_node(&self, drive_id: &str, node_id: &str, label: &str) -> Result<()> {
        let label = normalize_label(label).ok_or_else(|| DriveError::InvalidName(label.to_string()))?;

        let mut drives = self.drives.write();
        let drive = drives
            .get_mut(drive_id)
            .ok_or_else(|| DriveError::DriveNotFound(drive_id.to_string()))?;
        let node = drive.node_mut(node_id).ok_or_else(|| DriveError::NodeNotFound {
            drive_id: drive_id.to_string(),
            node_id: node_id.to_string(),
        })?;

        tracing::info!("Renamed {}: {} -> {}", node_id, node.label, label);
        node.label = label.clone();
        if let Some(document) = drive.documents.get_mut(node_id) {
            document.name = label;
            document.revision += 1;
        }
        drive.touch();
        Ok(())
    }

    /// Copy a file next to the original, returning the new node
    pub fn copy_node(&self, drive_id: &str, node_id: &str) -> Result<Node> {
        let mut drives = self.drives.write();
        let drive = drives
            .get_mut(drive_id)
            .ok_or_else(|| DriveError::DriveNotFound(drive_id.to_string()))?;
        let source = drive.node(node_id).cloned().ok_or_else(|| DriveError::NodeNotFound {
            drive_id: drive_id.to_string(),
            node_id: node_id.to_string(),
        })?;

        if !source.is_file() {
            return Err(DriveError::NotAFile(node_id.to_string()));
        }

        let label = copy_label(
            &source.label,
            drive.children(source.parent_id.as_deref()).map(|n| n.label.as_str()),
        );
        let copy = Node {
            id: uuid::Uuid::new_v4().to_string(),
            label,
            ..source
        };

        if let Some(document) = drive.documents.get(node_id).cloned() {
            drive.documents.insert(
                copy.id.clone(),
                Document {
                    id: copy.id.clone(),
                    name: copy.label.clone(),
                    revision: 0,
                    ..document
                },
            );
        }

        tracing::info!("Copied {} to {} ({})", node_id, copy.id, copy.label);
        drive.nodes.push(copy.clone());
        drive.touch();
        Ok(copy)
    }

    /// Delete a node; folders are deleted with their contents
    pub fn delete_node(&self, drive_id: &str, node_id: &str) -> Result<Vec<String>> {
        let mut drives = self.drives.write();
        let drive = drives
            .get_mut(drive_id)
            .ok_or_else(|| DriveError::DriveNotFound(drive_id.to_string()))?;
        if drive.node(node_id).is_none() {
            return Err(DriveError::NodeNotFound {
                drive_id: drive_id.to_string(),
                node_id: node_id.to_string(),
            });
        }

        let removed = drive.subtree_ids(node_id);
        drive.nodes.retain(|n| !removed.contains(&n.id));
        for id in &removed {
            drive.documents.remove(id);
        }
        drive.touch();

        tracing::warn!("Deleted {} node(s) from drive {}", removed.len(), drive_id);
        Ok(removed)
    }

    pub fn clear(&self) -> usize {
        let mut drives = self.drives.write();
        let count = drives.len();
        drives.clear();
        count
    }
}

impl DocumentLookup for DocumentDriveServer {
    fn get_document_by_id(&self, drive_id: &str, node_id: &str) -> Option<Document> {
        self.drives.read().get(drive_id).and_then(|d| d.documents.get(node_id).cloned())
    }
}

#[async_trait]
impl DrivesContainer for DocumentDriveServer {
    fn update_node_name(&self, node: &Node, drive_id: &str) {
        if let Err(e) = self.rename_node(drive_id, &node.id, &node.label) {
            tracing::error!("Failed to rename {}: {}", node.id, e);
        }
    }

    async fn submit_input(&self, input: NodeInput) -> std::result::Result<(), AppError> {
        tracing::debug!("Input {} for {} in {}", input.action.as_str(), input.node.id, input.node.drive_id);
        match input.action {
            NodeAction::UpdateAndCopy => {
                self.copy_node(&input.node.drive_id, &input.node.id)?;
            }
        }
        Ok(())
    }
}

impl DriveDirectory for DocumentDriveServer {
    fn is_remote_drive(&self, drive_id: &str) -> bool {
        self.drive_info(drive_id).map_or(false, |info| info.is_remote())
    }

    fn remote_url(&self, drive_id: &str) -> Option<String> {
        self.drive_info(drive_id).and_then(|info| info.remote_url)
    }

    fn readable_item_path(&self, drive_id: &str, node_id: &str) -> String {
        let drives = self.drives.read();
        let Some(drive) = drives.get(drive_id) else {
            return String::new();
        };

        let mut parts = vec![drive.info.name.clone()];
        parts.extend(drive.ancestor_labels(node_id));
        parts.join(" / ")
    }
}

#[async_trait]
impl StorageServer for DocumentDriveServer {
    async fn clear_storage(&self) -> std::result::Result<(), AppError> {
        let count = self.clear();
        tracing::warn!("Cleared storage ({} drives removed)", count);
        Ok(())
    }
}
