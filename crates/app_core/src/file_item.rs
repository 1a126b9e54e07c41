//! File item controller: one drive node with its context menu and inline rename

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::command::{CommandRouter, Dispatched};
use crate::edit_mode::{EditMode, EditOutcome};
use crate::i18n::I18n;
use crate::node::{decode_drive_id, Node};
use crate::option::NodeOption;
use crate::services::FileItemServices;

/// Called with `(drive_id, node_id)` when the item is opened
pub type SelectionCallback = Box<dyn Fn(&str, &str) + Send + Sync>;

/// Context-menu entry ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: &'static str,
    pub label: String,
    pub icon: &'static str,
}

/// Result of clicking a context-menu option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Unknown or not offered for this item
    Ignored,
    /// Another action of this item is still running
    Busy,
    Done(Dispatched),
    /// The action failed and the error has been logged; `retryable` for transient errors
    Failed { retryable: bool },
}

pub struct FileItem {
    node: RwLock<Node>,
    drive_id: String,
    mode: Mutex<EditMode>,
    in_flight: AtomicBool,
    router: CommandRouter,
    services: FileItemServices,
    on_selected: SelectionCallback,
}

/// Clears the in-flight flag when the dispatch ends, even if it is dropped midway
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FileItem {
    /// `drive_ref` is the drive reference as routed (percent-encoded)
    pub fn new<F>(node: Node, drive_ref: &str, services: FileItemServices, on_selected: F) -> Self
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        let drive_id = decode_drive_id(drive_ref);

        let mut node = node;
        if node.drive_id != drive_id {
            tracing::warn!("Node {} moved from drive {} to {}", node.id, node.drive_id, drive_id);
            node.drive_id = drive_id.clone();
        }

        Self {
            node: RwLock::new(node),
            drive_id,
            mode: Mutex::new(EditMode::Read),
            in_flight: AtomicBool::new(false),
            router: CommandRouter::new(services.clone()),
            services,
            on_selected: Box::new(on_selected),
        }
    }

    pub fn node(&self) -> Node {
        self.node.read().clone()
    }

    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    pub fn mode(&self) -> EditMode {
        *self.mode.lock()
    }

    pub fn title(&self) -> String {
        self.node.read().label.clone()
    }

    /// Readable location of the item, shown under the title
    pub fn subtitle(&self) -> String {
        let node_id = self.node.read().id.clone();
        self.services.directory().readable_item_path(&self.drive_id, &node_id)
    }

    /// Options offered in the context menu; none without create permission
    pub fn item_options(&self) -> Vec<NodeOption> {
        if !self.services.permissions().is_allowed_to_create_documents() {
            return Vec::new();
        }

        NodeOption::for_drive(self.services.directory().is_remote_drive(&self.drive_id))
    }

    pub fn menu_entries(&self, i18n: &I18n) -> Vec<MenuEntry> {
        self.item_options()
            .into_iter()
            .map(|option| MenuEntry {
                id: option.id(),
                label: i18n.get(option.label_key()),
                icon: option.icon(),
            })
            .collect()
    }

    /// Whether the context menu accepts clicks right now
    pub fn options_enabled(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    /// Handle a context-menu click; failures are logged, never returned
    pub async fn on_options_click(&self, option_id: &str) -> ClickOutcome {
        let Some(option) = NodeOption::parse(option_id) else {
            tracing::debug!("Ignoring unknown option {:?}", option_id);
            return ClickOutcome::Ignored;
        };

        if !self.item_options().contains(&option) {
            tracing::debug!("Option {} is not offered for {}", option, self.title());
            return ClickOutcome::Ignored;
        }

        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!("Option {} ignored, an action is still running", option);
            return ClickOutcome::Busy;
        }
        let _guard = InFlight(&self.in_flight);

        let node = self.node();
        match self.router.dispatch(option, &node, &self.drive_id, &self.mode).await {
            Ok(dispatched) => ClickOutcome::Done(dispatched),
            Err(e) if e.is_transient() => {
                tracing::warn!("Option {} failed for {}: {}", option, node.id, e);
                ClickOutcome::Failed { retryable: true }
            }
            Err(e) => {
                tracing::error!("Option {} failed for {}: {}", option, node.id, e);
                ClickOutcome::Failed { retryable: false }
            }
        }
    }

    /// Open the item unless it is being renamed; returns whether it was opened
    pub fn on_click(&self) -> bool {
        if self.mode().is_write() {
            return false;
        }

        let node_id = self.node.read().id.clone();
        (self.on_selected)(&self.drive_id, &node_id);
        true
    }

    /// Commit an inline rename
    pub fn on_submit_input(&self, value: &str) {
        let outcome = self.mode.lock().submit(value);

        let EditOutcome::Submitted(label) = outcome else {
            tracing::debug!("Submit ignored, {} is in {} mode", self.title(), self.mode().as_str());
            return;
        };

        let renamed = {
            let mut node = self.node.write();
            *node = node.relabeled(&label);
            node.clone()
        };

        self.services.drives().update_node_name(&renamed, &self.drive_id);
    }

    /// Abort an inline rename
    pub fn on_cancel_input(&self) {
        if self.mode.lock().cancel() == EditOutcome::Ignored {
            tracing::debug!("Cancel ignored, {} is in {} mode", self.title(), self.mode().as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::Mocks;
    use crate::modal::Modal;
    use crate::node::{Document, NodeAction, NodeInput};
    use crate::AppError;
    use std::sync::Arc;

    fn report() -> Node {
        Node::file("f1", "report.txt", "d1")
    }

    /// Mocks for a local drive where the user may create documents
    fn local_mocks() -> Mocks {
        let mut mocks = Mocks::default();
        mocks.permissions.expect_is_allowed_to_create_documents().return_const(true);
        mocks.directory.expect_is_remote_drive().return_const(false);
        mocks
    }

    fn remote_mocks() -> Mocks {
        let mut mocks = Mocks::default();
        mocks.permissions.expect_is_allowed_to_create_documents().return_const(true);
        mocks.directory.expect_is_remote_drive().return_const(true);
        mocks
    }

    fn item(mocks: Mocks) -> FileItem {
        FileItem::new(report(), "d1", mocks.into_services(), |_: &str, _: &str| {})
    }

    #[tokio::test]
    async fn test_rename_then_cancel_keeps_label() {
        let mut mocks = local_mocks();
        mocks.drives.expect_update_node_name().never();
        let item = item(mocks);

        assert_eq!(
            item.on_options_click("rename").await,
            ClickOutcome::Done(Dispatched::EditStarted)
        );
        assert_eq!(item.mode(), EditMode::Write);

        item.on_cancel_input();

        assert_eq!(item.title(), "report.txt");
        assert_eq!(item.mode(), EditMode::Read);
    }

    #[tokio::test]
    async fn test_rename_then_submit_updates_label() {
        let mut mocks = local_mocks();
        mocks
            .drives
            .expect_update_node_name()
            .withf(|node, drive_id| node.id == "f1" && node.label == "NewName" && drive_id == "d1")
            .times(1)
            .return_const(());
        let item = item(mocks);

        item.on_options_click("rename").await;
        item.on_submit_input("NewName");

        assert_eq!(item.title(), "NewName");
        assert_eq!(item.mode(), EditMode::Read);
    }

    #[tokio::test]
    async fn test_submit_outside_write_mode_is_ignored() {
        let mut mocks = local_mocks();
        mocks.drives.expect_update_node_name().never();
        let item = item(mocks);

        item.on_submit_input("NewName");

        assert_eq!(item.title(), "report.txt");
    }

    #[tokio::test]
    async fn test_unknown_option_changes_nothing() {
        let mut mocks = local_mocks();
        mocks.modals.expect_show().never();
        mocks.drives.expect_submit_input().never();
        mocks.documents.expect_get_document_by_id().never();
        let item = item(mocks);

        assert_eq!(item.on_options_click("share").await, ClickOutcome::Ignored);
        assert_eq!(item.mode(), EditMode::Read);
        assert_eq!(item.node(), report());
    }

    #[tokio::test]
    async fn test_delete_shows_one_confirmation() {
        let mut mocks = local_mocks();
        mocks
            .modals
            .expect_show()
            .withf(|modal| matches!(modal, Modal::DeleteItem(m) if m.item_id == "f1" && m.item_name == "report.txt"))
            .times(1)
            .return_const(());
        mocks.drives.expect_submit_input().never();
        let item = item(mocks);

        assert_eq!(
            item.on_options_click("delete").await,
            ClickOutcome::Done(Dispatched::DeleteRequested)
        );
    }

    #[tokio::test]
    async fn test_duplicate_sends_one_copy_request() {
        let mut mocks = local_mocks();
        mocks
            .drives
            .expect_submit_input()
            .withf(|input| {
                *input
                    == NodeInput {
                        node: Node::file("f1", "report.txt", "d1"),
                        action: NodeAction::UpdateAndCopy,
                    }
            })
            .times(1)
            .returning(|_| Ok(()));
        let item = item(mocks);

        assert_eq!(
            item.on_options_click("duplicate").await,
            ClickOutcome::Done(Dispatched::Duplicated)
        );
        assert!(item.options_enabled());
    }

    #[tokio::test]
    async fn test_duplicate_failure_is_swallowed() {
        let mut mocks = local_mocks();
        mocks
            .drives
            .expect_submit_input()
            .returning(|_| Err(AppError::Copy("boom".into())));
        let item = item(mocks);

        assert_eq!(
            item.on_options_click("duplicate").await,
            ClickOutcome::Failed { retryable: false }
        );
        assert!(item.options_enabled());
    }

    #[tokio::test]
    async fn test_switchboard_link_only_on_remote_drives() {
        let mut mocks = local_mocks();
        mocks.documents.expect_get_document_by_id().never();
        let item = item(mocks);

        assert!(!item.item_options().contains(&NodeOption::SwitchboardLink));
        assert_eq!(item.on_options_click("switchboard-link").await, ClickOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_switchboard_link_without_document() {
        let mut mocks = remote_mocks();
        mocks.documents.expect_get_document_by_id().returning(|_, _| None);
        mocks.switchboard.expect_open().never();
        let item = item(mocks);

        assert_eq!(item.item_options()[0], NodeOption::SwitchboardLink);
        assert_eq!(
            item.on_options_click("switchboard-link").await,
            ClickOutcome::Done(Dispatched::NoDocument)
        );
    }

    #[tokio::test]
    async fn test_switchboard_open_failure_is_swallowed() {
        let mut mocks = remote_mocks();
        mocks.documents.expect_get_document_by_id().returning(|_, _| {
            Some(Document {
                id: "f1".into(),
                name: "report.txt".into(),
                document_type: "powerhouse/budget-statement".into(),
                revision: 1,
            })
        });
        mocks
            .switchboard
            .expect_open()
            .times(1)
            .returning(|_, _| Err(AppError::Open("no browser".into())));
        let item = item(mocks);

        assert_eq!(
            item.on_options_click("switchboard-link").await,
            ClickOutcome::Failed { retryable: true }
        );
    }

    #[tokio::test]
    async fn test_no_options_without_permission() {
        let mut mocks = Mocks::default();
        mocks.permissions.expect_is_allowed_to_create_documents().return_const(false);
        mocks.modals.expect_show().never();
        let item = item(mocks);

        assert!(item.item_options().is_empty());
        assert_eq!(item.on_options_click("delete").await, ClickOutcome::Ignored);
    }

    /// Drives container whose copy requests wait until released
    #[derive(Default)]
    struct GatedDrives {
        started: tokio::sync::Notify,
        release: tokio::sync::Notify,
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl crate::services::DrivesContainer for GatedDrives {
        fn update_node_name(&self, _node: &Node, _drive_id: &str) {}

        async fn submit_input(&self, _input: NodeInput) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    fn gated_item(drives: Arc<GatedDrives>) -> Arc<FileItem> {
        let mocks = local_mocks();
        let services = FileItemServices::new(
            Arc::new(mocks.documents),
            drives,
            Arc::new(mocks.directory),
            Arc::new(mocks.switchboard),
            Arc::new(mocks.modals),
            Arc::new(mocks.permissions),
        );
        Arc::new(FileItem::new(report(), "d1", services, |_: &str, _: &str| {}))
    }

    #[tokio::test]
    async fn test_option_ignored_while_duplicate_pending() {
        let drives = Arc::new(GatedDrives::default());
        let item = gated_item(drives.clone());

        let first = tokio::spawn({
            let item = item.clone();
            async move { item.on_options_click("duplicate").await }
        });
        drives.started.notified().await;

        assert!(!item.options_enabled());
        assert_eq!(item.on_options_click("duplicate").await, ClickOutcome::Busy);
        assert_eq!(item.on_options_click("rename").await, ClickOutcome::Busy);
        assert_eq!(item.mode(), EditMode::Read);

        drives.release.notify_one();
        assert_eq!(first.await.unwrap(), ClickOutcome::Done(Dispatched::Duplicated));
        assert_eq!(drives.calls.load(Ordering::SeqCst), 1);
        assert!(item.options_enabled());
    }

    #[tokio::test]
    async fn test_options_reenabled_when_pending_action_is_dropped() {
        let drives = Arc::new(GatedDrives::default());
        let item = gated_item(drives.clone());

        let first = tokio::spawn({
            let item = item.clone();
            async move { item.on_options_click("duplicate").await }
        });
        drives.started.notified().await;
        assert!(!item.options_enabled());

        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());
        assert!(item.options_enabled());
    }

    #[tokio::test]
    async fn test_click_selects_unless_renaming() {
        let selected = Arc::new(Mutex::new(Vec::new()));
        let sink = selected.clone();
        let item = FileItem::new(
            report(),
            "d1",
            local_mocks().into_services(),
            move |drive_id: &str, node_id: &str| {
                sink.lock().push((drive_id.to_string(), node_id.to_string()))
            },
        );

        assert!(item.on_click());
        item.on_options_click("rename").await;
        assert!(!item.on_click());

        assert_eq!(*selected.lock(), vec![("d1".to_string(), "f1".to_string())]);
    }

    #[test]
    fn test_encoded_drive_reference() {
        let mut mocks = Mocks::default();
        mocks
            .directory
            .expect_readable_item_path()
            .withf(|drive_id, node_id| drive_id == "my drive" && node_id == "f1")
            .return_const("My Drive / Reports".to_string());
        let node = Node::file("f1", "report.txt", "my drive");
        let item = FileItem::new(node, "my%20drive", mocks.into_services(), |_: &str, _: &str| {});

        assert_eq!(item.drive_id(), "my drive");
        assert_eq!(item.subtitle(), "My Drive / Reports");
    }

    #[test]
    fn test_menu_entries_are_localized() {
        let item = item(remote_mocks());
        let entries = item.menu_entries(&I18n::default());

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].id, "switchboard-link");
        assert_eq!(entries[0].label, "Open in Switchboard");
        assert_eq!(entries[1].label, "Delete");
    }
}
