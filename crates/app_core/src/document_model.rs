//! Document models with pluggable editors

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ConfigStore;
use crate::services::DocumentModels;

/// Editor-backed document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentModel {
    pub id: String,
    pub name: String,
}

impl DocumentModel {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// Multi-select entry for this model
    pub fn to_option(&self) -> SelectOption {
        SelectOption {
            label: self.name.clone(),
            value: self.id.clone(),
        }
    }
}

/// Entry of a multi-select control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

pub fn to_options(models: &[DocumentModel]) -> Vec<SelectOption> {
    models.iter().map(DocumentModel::to_option).collect()
}

/// Models shipped with the application
pub fn builtin_models() -> Vec<DocumentModel> {
    vec![
        DocumentModel::new("powerhouse/budget-statement", "Budget Statement"),
        DocumentModel::new("makerdao/rwa-portfolio", "RWA Portfolio"),
        DocumentModel::new("powerhouse/account-snapshot", "Account Snapshot"),
        DocumentModel::new("powerhouse/scope-framework", "Scope Framework"),
        DocumentModel::new("powerhouse/document-model", "Document Model"),
    ]
}

/// Known models filtered by the editors config
pub struct DocumentModelCatalog {
    models: RwLock<Vec<DocumentModel>>,
    config: Arc<ConfigStore>,
}

impl DocumentModelCatalog {
    pub fn new(models: Vec<DocumentModel>, config: Arc<ConfigStore>) -> Self {
        Self {
            models: RwLock::new(models),
            config,
        }
    }

    /// Register an additional model, replacing one with the same id
    pub fn register(&self, model: DocumentModel) {
        let mut models = self.models.write();
        match models.iter_mut().find(|m| m.id == model.id) {
            Some(existing) => *existing = model,
            None => models.push(model),
        }
    }
}

impl DocumentModels for DocumentModelCatalog {
    fn document_models(&self) -> Vec<DocumentModel> {
        self.models.read().clone()
    }

    fn enabled_document_models(&self) -> Vec<DocumentModel> {
        let editors = self.config.editors();
        self.models
            .read()
            .iter()
            .filter(|m| editors.is_enabled(&m.id))
            .cloned()
            .collect()
    }
}
