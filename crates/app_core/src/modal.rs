//! Modals requested by controllers

use crate::node::NodeKind;

/// Modal shown through a [`crate::services::ModalPresenter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    DeleteItem(DeleteItemModal),
    Confirmation(ConfirmationModal),
    Settings,
}

impl Modal {
    /// Registry name of the modal
    pub fn kind(&self) -> &'static str {
        match self {
            Modal::DeleteItem(_) => "deleteItem",
            Modal::Confirmation(_) => "confirmationModal",
            Modal::Settings => "settingsModal",
        }
    }
}

/// Asks the user to confirm deletion of a drive item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteItemModal {
    pub drive_id: String,
    pub item_id: String,
    pub item_name: String,
    pub item_type: NodeKind,
}

/// What a confirmation modal's continue button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmIntent {
    ClearStorage,
}

/// Generic yes/no confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationModal {
    pub title: String,
    pub body: String,
    pub cancel_label: String,
    pub continue_label: String,
    pub intent: ConfirmIntent,
}
