//! Drives and their on-disk snapshot format

use app_core::{Document, Node};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{DriveError, Result};

/// Drive metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInfo {
    pub id: String,
    pub name: String,
    /// Switchboard URL of a remote drive, `None` for local drives
    #[serde(default)]
    pub remote_url: Option<String>,
}

impl DriveInfo {
    pub fn local(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            remote_url: None,
        }
    }

    pub fn remote(id: &str, name: &str, remote_url: &str) -> Self {
        Self {
            remote_url: Some(remote_url.to_string()),
            ..Self::local(id, name)
        }
    }

    pub fn is_remote(&self) -> bool {
        self.remote_url.is_some()
    }
}

/// A drive with its tree and the documents behind its files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drive {
    #[serde(flatten)]
    pub info: DriveInfo,
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Documents keyed by file node id
    #[serde(default)]
    pub documents: HashMap<String, Document>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Drive {
    pub fn new(info: DriveInfo) -> Self {
        Self {
            info,
            nodes: Vec::new(),
            documents: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn node_mut(&mut self, node_id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    /// Direct children of `parent_id` (top level for `None`)
    pub fn children(&self, parent_id: Option<&str>) -> impl Iterator<Item = &Node> {
        let parent_id = parent_id.map(str::to_string);
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_deref() == parent_id.as_deref())
    }

    /// `node_id` and every node below it
    pub fn subtree_ids(&self, node_id: &str) -> Vec<String> {
        let mut ids = vec![node_id.to_string()];
        let mut i = 0;
        while i < ids.len() {
            let parent = ids[i].clone();
            ids.extend(
                self.nodes
                    .iter()
                    .filter(|n| n.parent_id.as_deref() == Some(parent.as_str()))
                    .map(|n| n.id.clone()),
            );
            i += 1;
        }
        ids
    }

    /// Labels of the folders containing `node_id`, outermost first
    pub fn ancestor_labels(&self, node_id: &str) -> Vec<String> {
        let mut labels = Vec::new();
        let mut current = self.node(node_id).and_then(|n| n.parent_id.clone());

        // A corrupt snapshot may contain parent cycles
        let mut hops = 0;
        while let Some(parent_id) = current {
            if hops > self.nodes.len() {
                tracing::warn!("Parent cycle at {} in drive {}", parent_id, self.info.id);
                break;
            }
            let Some(parent) = self.node(&parent_id) else {
                break;
            };
            labels.push(parent.label.clone());
            current = parent.parent_id.clone();
            hops += 1;
        }

        labels.reverse();
        labels
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Drives stored in a JSON snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriveSnapshot {
    pub drives: Vec<Drive>,
}

impl DriveSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DriveError::SnapshotNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&content)?;
        tracing::info!("Loaded {} drives from {:?}", snapshot.drives.len(), path);
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Saved {} drives to {:?}", self.drives.len(), path);
        Ok(())
    }
}
