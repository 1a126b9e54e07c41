//! Text rendering of modals and the modal presenter behind it

use app_core::{t, ConfirmationModal, DeleteItemModal, I18n, Modal, ModalPresenter, SettingsModal};
use parking_lot::Mutex;
use std::io::Write;

/// Holds the single modal currently shown
#[derive(Default)]
pub struct ConsoleModals {
    pending: Mutex<Option<Modal>>,
    fresh: Mutex<bool>,
}

impl ConsoleModals {
    /// Modal shown since the last call, if any
    pub fn take_fresh(&self) -> Option<Modal> {
        let mut fresh = self.fresh.lock();
        if !std::mem::take(&mut *fresh) {
            return None;
        }
        self.pending.lock().clone()
    }

    /// Dismiss the current modal
    pub fn take(&self) -> Option<Modal> {
        *self.fresh.lock() = false;
        self.pending.lock().take()
    }

    pub fn current(&self) -> Option<Modal> {
        self.pending.lock().clone()
    }
}

impl ModalPresenter for ConsoleModals {
    fn show(&self, modal: Modal) {
        tracing::debug!("Showing modal {}", modal.kind());
        *self.pending.lock() = Some(modal);
        *self.fresh.lock() = true;
    }
}

pub fn render_modal(modal: &Modal, i18n: &I18n, out: &mut dyn Write) -> std::io::Result<()> {
    match modal {
        Modal::DeleteItem(m) => render_delete(m, i18n, out),
        Modal::Confirmation(m) => render_confirmation(m, out),
        Modal::Settings => Ok(()),
    }
}

fn render_delete(modal: &DeleteItemModal, i18n: &I18n, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "== {} ==", t!(i18n, "modals-delete-item-title"))?;
    writeln!(out, "{}", t!(i18n, "modals-delete-item-body", name = modal.item_name.clone()))?;
    writeln!(
        out,
        "[yes] {}  [no] {}",
        t!(i18n, "modals-delete-item-continue"),
        t!(i18n, "common-cancel")
    )
}

fn render_confirmation(modal: &ConfirmationModal, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "== {} ==", modal.title)?;
    writeln!(out, "{}", modal.body)?;
    writeln!(out, "[yes] {}  [no] {}", modal.continue_label, modal.cancel_label)
}

pub fn render_settings(settings: &SettingsModal, out: &mut dyn Write) -> std::io::Result<()> {
    let texts = settings.texts();
    let selected = settings.selected();

    writeln!(out, "== {} ==", texts.title)?;
    writeln!(out, "{}", texts.body)?;
    writeln!(out)?;
    writeln!(out, "{}: {}", texts.document_types_title, settings.selection_summary())?;
    writeln!(out, "  {}", texts.document_types_description)?;
    for option in settings.options() {
        let mark = if selected.iter().any(|s| s.value == option.value) { "x" } else { " " };
        writeln!(out, "  [{}] {} ({})", mark, option.label, option.value)?;
    }
    writeln!(out)?;
    writeln!(out, "[clear-storage] {}", texts.clear_storage_button)?;
    writeln!(out, "  {}", texts.clear_storage_description)?;
    writeln!(out, "[save] {}  [close] {}", texts.save_label, texts.cancel_label)
}
