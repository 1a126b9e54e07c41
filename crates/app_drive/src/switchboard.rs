//! Opening documents on their drive's switchboard

use std::sync::Arc;

use app_core::{switchboard_url, AppError, Document, DriveDirectory, SwitchboardOpener};
use async_trait::async_trait;

/// Hands a URL to whatever displays it
pub type Launcher = Arc<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

#[cfg(feature = "open-external")]
fn system_launcher() -> Launcher {
    Arc::new(|url: &str| open::that(url))
}

#[cfg(not(feature = "open-external"))]
fn system_launcher() -> Launcher {
    Arc::new(|_: &str| {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "Open external feature not enabled",
        ))
    })
}

/// Builds switchboard URLs from drive metadata and opens them in the browser
pub struct SwitchboardLinkOpener {
    directory: Arc<dyn DriveDirectory>,
    launcher: Launcher,
}

impl SwitchboardLinkOpener {
    pub fn new(directory: Arc<dyn DriveDirectory>) -> Self {
        Self::with_launcher(directory, system_launcher())
    }

    pub fn with_launcher(directory: Arc<dyn DriveDirectory>, launcher: Launcher) -> Self {
        Self { directory, launcher }
    }
}

#[async_trait]
impl SwitchboardOpener for SwitchboardLinkOpener {
    async fn open(&self, drive_id: &str, document: &Document) -> Result<(), AppError> {
        let remote_url = self
            .directory
            .remote_url(drive_id)
            .ok_or_else(|| AppError::NotRemote(drive_id.to_string()))?;
        let url = switchboard_url(&remote_url, document)?;

        // Browser launch blocks on some platforms
        let launcher = Arc::clone(&self.launcher);
        let target = url.to_string();
        tokio::task::spawn_blocking(move || (*launcher)(&target))
            .await
            .map_err(|e| AppError::Open(e.to_string()))?
            .map_err(|e| AppError::Open(format!("{}: {}", url, e)))?;

        tracing::info!("Opened {} on switchboard: {}", document.id, url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentDriveServer, Drive, DriveInfo};
    use parking_lot::Mutex;

    fn document() -> Document {
        Document {
            id: "doc-1".into(),
            name: "report.txt".into(),
            document_type: "powerhouse/budget-statement".into(),
            revision: 1,
        }
    }

    fn directory() -> Arc<DocumentDriveServer> {
        let server = DocumentDriveServer::new();
        server.add_drive(Drive::new(DriveInfo::local("d1", "My Drive"))).unwrap();
        server
            .add_drive(Drive::new(DriveInfo::remote("r1", "Team", "https://sb.example.com/d/team")))
            .unwrap();
        Arc::new(server)
    }

    fn recording() -> (Launcher, Arc<Mutex<Vec<String>>>) {
        let opened = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&opened);
        let launcher: Launcher = Arc::new(move |url: &str| {
            sink.lock().push(url.to_string());
            Ok(())
        });
        (launcher, opened)
    }

    #[tokio::test]
    async fn test_opens_remote_document() {
        let (launcher, opened) = recording();
        let opener = SwitchboardLinkOpener::with_launcher(directory(), launcher);

        opener.open("r1", &document()).await.unwrap();

        assert_eq!(
            *opened.lock(),
            vec!["https://sb.example.com/d/team/powerhouse%2Fbudget-statement/doc-1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_local_drive_is_rejected() {
        let (launcher, opened) = recording();
        let opener = SwitchboardLinkOpener::with_launcher(directory(), launcher);

        let result = opener.open("d1", &document()).await;

        assert!(matches!(result, Err(AppError::NotRemote(id)) if id == "d1"));
        assert!(opened.lock().is_empty());
    }

    #[tokio::test]
    async fn test_launcher_failure() {
        let launcher: Launcher =
            Arc::new(|_: &str| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no browser")));
        let opener = SwitchboardLinkOpener::with_launcher(directory(), launcher);

        let result = opener.open("r1", &document()).await;

        assert!(matches!(result, Err(AppError::Open(_))));
    }
}
