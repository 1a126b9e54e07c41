//! Settings modal: enabled editors and local storage

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::EditorsConfig;
use crate::document_model::{to_options, SelectOption};
use crate::i18n::I18n;
use crate::modal::{ConfirmIntent, ConfirmationModal, Modal};
use crate::services::SettingsServices;

/// Static texts of the settings modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsTexts {
    pub title: String,
    pub body: String,
    pub cancel_label: String,
    pub save_label: String,
    pub document_types_title: String,
    pub document_types_description: String,
    pub all_selected: String,
    pub clear_storage_button: String,
    pub clear_storage_description: String,
}

pub struct SettingsModal {
    open: AtomicBool,
    selected: RwLock<Vec<SelectOption>>,
    services: SettingsServices,
    i18n: Arc<I18n>,
}

impl SettingsModal {
    /// Open the modal with the currently enabled editors selected
    pub fn new(services: SettingsServices, i18n: Arc<I18n>) -> Self {
        let selected = to_options(&services.models.enabled_document_models());

        Self {
            open: AtomicBool::new(true),
            selected: RwLock::new(selected),
            services,
            i18n,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn texts(&self) -> SettingsTexts {
        let t = |key: &str| self.i18n.get(key);
        SettingsTexts {
            title: t("modals-connect-settings-title"),
            body: t("modals-connect-settings-body"),
            cancel_label: t("common-cancel"),
            save_label: t("common-save"),
            document_types_title: t("modals-connect-settings-enabled-document-types-title"),
            document_types_description: t("modals-connect-settings-enabled-document-types-description"),
            all_selected: t("modals-connect-settings-enabled-document-types-all-selected"),
            clear_storage_button: t("modals-connect-settings-clear-storage-button"),
            clear_storage_description: t("modals-connect-settings-clear-storage-description"),
        }
    }

    /// Every document model as a selectable option
    pub fn options(&self) -> Vec<SelectOption> {
        to_options(&self.services.models.document_models())
    }

    pub fn selected(&self) -> Vec<SelectOption> {
        self.selected.read().clone()
    }

    pub fn set_selected(&self, selected: Vec<SelectOption>) {
        *self.selected.write() = selected;
    }

    /// Label summarizing the selection for the multi-select control
    pub fn selection_summary(&self) -> String {
        let selected = self.selected.read();
        let all = self.options();
        if !all.is_empty() && all.iter().all(|o| selected.iter().any(|s| s.value == o.value)) {
            return self.i18n.get("modals-connect-settings-enabled-document-types-all-selected");
        }

        selected.iter().map(|s| s.label.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// Store the selection as the enabled editors and close
    pub fn save(&self) {
        let enabled_editors = self.selected.read().iter().map(|s| s.value.clone()).collect();

        self.services.flags.set_editors_config(EditorsConfig {
            enabled_editors: Some(enabled_editors),
        });
        tracing::info!("Enabled editors saved");

        self.close();
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Open-state change requested by the host; only closing is honored
    pub fn on_open_change(&self, open: bool) {
        if !open {
            self.close();
        }
    }

    /// Ask for confirmation before clearing local storage
    pub fn request_clear_storage(&self) {
        let t = |key: &str| self.i18n.get(key);
        self.services.modals.show(Modal::Confirmation(ConfirmationModal {
            title: t("modals-connect-settings-clear-storage-confirmation-title"),
            body: t("modals-connect-settings-clear-storage-confirmation-body"),
            cancel_label: t("common-cancel"),
            continue_label: t("modals-connect-settings-clear-storage-confirmation-clear-button"),
            intent: ConfirmIntent::ClearStorage,
        }));
    }

    /// Clear storage in the background and return to the settings modal.
    ///
    /// Must be called inside a tokio runtime. Failures are logged only.
    pub fn confirm_clear_storage(&self) -> JoinHandle<()> {
        let storage = self.services.storage.clone();
        let handle = tokio::spawn(async move {
            match storage.clear_storage().await {
                Ok(()) => tracing::info!("Local storage cleared"),
                Err(e) => tracing::error!("Failed to clear storage: {}", e),
            }
        });

        self.services.modals.show(Modal::Settings);
        handle
    }

    pub fn cancel_clear_storage(&self) {
        self.services.modals.show(Modal::Settings);
    }
}
