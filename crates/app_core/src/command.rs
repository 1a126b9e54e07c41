//! Command routing for node context-menu options

use parking_lot::Mutex;

use crate::edit_mode::EditMode;
use crate::modal::{DeleteItemModal, Modal};
use crate::node::{Node, NodeAction, NodeInput, NodeKind};
use crate::option::NodeOption;
use crate::services::FileItemServices;
use crate::AppError;

/// What a dispatched option did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Delete confirmation shown, nothing deleted yet
    DeleteRequested,
    /// Copy request completed
    Duplicated,
    /// Node switched to write mode
    EditStarted,
    LinkOpened,
    /// Node has no backing document, nothing opened
    NoDocument,
}

/// Routes a selected option to exactly one action against a node
pub struct CommandRouter {
    services: FileItemServices,
}

impl CommandRouter {
    pub fn new(services: FileItemServices) -> Self {
        Self { services }
    }

    /// Dispatch `option` against `node` in `drive_id`.
    ///
    /// Delete and rename complete synchronously and never fail. Duplicate and
    /// switchboard-link await their collaborators and return their errors.
    pub async fn dispatch(
        &self,
        option: NodeOption,
        node: &Node,
        drive_id: &str,
        mode: &Mutex<EditMode>,
    ) -> Result<Dispatched, AppError> {
        tracing::debug!("Dispatching {} for {} in {}", option, node.id, drive_id);

        match option {
            NodeOption::Delete => {
                self.services.modals().show(Modal::DeleteItem(DeleteItemModal {
                    drive_id: drive_id.to_string(),
                    item_id: node.id.clone(),
                    item_name: node.label.clone(),
                    item_type: NodeKind::File,
                }));
                Ok(Dispatched::DeleteRequested)
            }
            NodeOption::Duplicate => {
                self.services
                    .drives()
                    .submit_input(NodeInput {
                        node: node.clone(),
                        action: NodeAction::UpdateAndCopy,
                    })
                    .await?;
                tracing::info!("Duplicated {} ({})", node.label, node.id);
                Ok(Dispatched::Duplicated)
            }
            NodeOption::Rename => {
                mode.lock().begin();
                Ok(Dispatched::EditStarted)
            }
            NodeOption::SwitchboardLink => {
                let Some(document) = self.services.documents().get_document_by_id(drive_id, &node.id)
                else {
                    tracing::debug!("No document behind {} in {}", node.id, drive_id);
                    return Ok(Dispatched::NoDocument);
                };

                self.services.switchboard().open(drive_id, &document).await?;
                Ok(Dispatched::LinkOpened)
            }
        }
    }

    /// Dispatch a wire identifier; identifiers outside the option set are ignored
    pub async fn dispatch_id(
        &self,
        option_id: &str,
        node: &Node,
        drive_id: &str,
        mode: &Mutex<EditMode>,
    ) -> Result<Option<Dispatched>, AppError> {
        match NodeOption::parse(option_id) {
            Some(option) => self.dispatch(option, node, drive_id, mode).await.map(Some),
            None => {
                tracing::debug!("Ignoring unknown option {:?}", option_id);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::node::Document;
    use crate::services::{
        MockDocumentLookup, MockDriveDirectory, MockDrivesContainer, MockModalPresenter,
        MockPermissions, MockSwitchboardOpener,
    };
    use mockall::predicate::eq;
    use std::sync::Arc;

    /// Mocks for every file item collaborator, nothing expected by default
    #[derive(Default)]
    pub(crate) struct Mocks {
        pub documents: MockDocumentLookup,
        pub drives: MockDrivesContainer,
        pub directory: MockDriveDirectory,
        pub switchboard: MockSwitchboardOpener,
        pub modals: MockModalPresenter,
        pub permissions: MockPermissions,
    }

    impl Mocks {
        pub(crate) fn into_services(self) -> FileItemServices {
            FileItemServices::new(
                Arc::new(self.documents),
                Arc::new(self.drives),
                Arc::new(self.directory),
                Arc::new(self.switchboard),
                Arc::new(self.modals),
                Arc::new(self.permissions),
            )
        }
    }

    fn report() -> Node {
        Node::file("f1", "report.txt", "d1")
    }

    fn document() -> Document {
        Document {
            id: "f1".into(),
            name: "report.txt".into(),
            document_type: "powerhouse/budget-statement".into(),
            revision: 0,
        }
    }

    #[tokio::test]
    async fn test_delete_requests_confirmation_once() {
        let mut mocks = Mocks::default();
        mocks
            .modals
            .expect_show()
            .withf(|modal| {
                *modal
                    == Modal::DeleteItem(DeleteItemModal {
                        drive_id: "d1".into(),
                        item_id: "f1".into(),
                        item_name: "report.txt".into(),
                        item_type: NodeKind::File,
                    })
            })
            .times(1)
            .return_const(());
        mocks.drives.expect_submit_input().never();
        let router = CommandRouter::new(mocks.into_services());
        let mode = Mutex::new(EditMode::Read);

        let result = router.dispatch(NodeOption::Delete, &report(), "d1", &mode).await.unwrap();

        assert_eq!(result, Dispatched::DeleteRequested);
        assert_eq!(*mode.lock(), EditMode::Read);
    }

    #[tokio::test]
    async fn test_duplicate_submits_update_and_copy() {
        let mut mocks = Mocks::default();
        mocks
            .drives
            .expect_submit_input()
            .with(eq(NodeInput {
                node: report(),
                action: NodeAction::UpdateAndCopy,
            }))
            .times(1)
            .returning(|_| Ok(()));
        mocks.modals.expect_show().never();
        let router = CommandRouter::new(mocks.into_services());
        let mode = Mutex::new(EditMode::Read);

        let result = router.dispatch(NodeOption::Duplicate, &report(), "d1", &mode).await.unwrap();

        assert_eq!(result, Dispatched::Duplicated);
    }

    #[tokio::test]
    async fn test_duplicate_failure_propagates() {
        let mut mocks = Mocks::default();
        mocks
            .drives
            .expect_submit_input()
            .times(1)
            .returning(|_| Err(AppError::Copy("disk full".into())));
        let router = CommandRouter::new(mocks.into_services());
        let mode = Mutex::new(EditMode::Read);

        let result = router.dispatch(NodeOption::Duplicate, &report(), "d1", &mode).await;

        assert!(matches!(result, Err(AppError::Copy(_))));
    }

    #[tokio::test]
    async fn test_rename_enters_write_mode_without_side_effects() {
        let mut mocks = Mocks::default();
        mocks.drives.expect_update_node_name().never();
        mocks.modals.expect_show().never();
        let router = CommandRouter::new(mocks.into_services());
        let mode = Mutex::new(EditMode::Read);

        let result = router.dispatch(NodeOption::Rename, &report(), "d1", &mode).await.unwrap();

        assert_eq!(result, Dispatched::EditStarted);
        assert_eq!(*mode.lock(), EditMode::Write);
    }

    #[tokio::test]
    async fn test_switchboard_link_opens_resolved_document() {
        let mut mocks = Mocks::default();
        mocks
            .documents
            .expect_get_document_by_id()
            .with(eq("d1"), eq("f1"))
            .times(1)
            .returning(|_, _| Some(document()));
        mocks
            .switchboard
            .expect_open()
            .withf(|drive_id, doc| drive_id == "d1" && doc.id == "f1")
            .times(1)
            .returning(|_, _| Ok(()));
        let router = CommandRouter::new(mocks.into_services());
        let mode = Mutex::new(EditMode::Read);

        let result = router
            .dispatch(NodeOption::SwitchboardLink, &report(), "d1", &mode)
            .await
            .unwrap();

        assert_eq!(result, Dispatched::LinkOpened);
    }

    #[tokio::test]
    async fn test_switchboard_link_without_document_is_noop() {
        let mut mocks = Mocks::default();
        mocks.documents.expect_get_document_by_id().times(1).returning(|_, _| None);
        mocks.switchboard.expect_open().never();
        let router = CommandRouter::new(mocks.into_services());
        let mode = Mutex::new(EditMode::Read);

        let result = router
            .dispatch(NodeOption::SwitchboardLink, &report(), "d1", &mode)
            .await
            .unwrap();

        assert_eq!(result, Dispatched::NoDocument);
    }

    #[tokio::test]
    async fn test_switchboard_open_failure_propagates() {
        let mut mocks = Mocks::default();
        mocks.documents.expect_get_document_by_id().returning(|_, _| Some(document()));
        mocks
            .switchboard
            .expect_open()
            .returning(|_, _| Err(AppError::Open("no browser".into())));
        let router = CommandRouter::new(mocks.into_services());
        let mode = Mutex::new(EditMode::Read);

        let result = router.dispatch(NodeOption::SwitchboardLink, &report(), "d1", &mode).await;

        assert!(matches!(result, Err(AppError::Open(_))));
    }

    #[tokio::test]
    async fn test_unknown_id_is_noop() {
        let mut mocks = Mocks::default();
        mocks.modals.expect_show().never();
        mocks.drives.expect_submit_input().never();
        mocks.drives.expect_update_node_name().never();
        mocks.documents.expect_get_document_by_id().never();
        mocks.switchboard.expect_open().never();
        let router = CommandRouter::new(mocks.into_services());
        let mode = Mutex::new(EditMode::Read);

        let result = router.dispatch_id("properties", &report(), "d1", &mode).await.unwrap();

        assert_eq!(result, None);
        assert_eq!(*mode.lock(), EditMode::Read);
    }

    #[tokio::test]
    async fn test_dispatch_id_parses_known_ids() {
        let router = CommandRouter::new(Mocks::default().into_services());
        let mode = Mutex::new(EditMode::Read);

        let result = router.dispatch_id("rename", &report(), "d1", &mode).await.unwrap();

        assert_eq!(result, Some(Dispatched::EditStarted));
    }
}
