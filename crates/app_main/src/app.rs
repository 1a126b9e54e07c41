//! Application main loop

use anyhow::{anyhow, bail, Result};
use app_core::{
    builtin_models, AppError, ClickOutcome, ConfigPermissions, ConfigStore, ConfirmIntent, Dispatched,
    Document, DocumentModel, DocumentModelCatalog, DocumentModels, FileItem, FileItemServices, I18n, Modal, ModalPresenter,
    Node, SettingsModal, SettingsServices, SwitchboardOpener,
};
use app_drive::{DocumentDriveServer, Drive, DriveInfo};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::console::{self, ConsoleModals};
use crate::shell::{ShellCommand, HELP};

/// Drives shown when no snapshot is configured
pub fn demo_server() -> Result<DocumentDriveServer> {
    let server = DocumentDriveServer::new();
    server.add_drive(Drive::new(DriveInfo::local("my-drive", "My Drive")))?;
    server.add_drive(Drive::new(DriveInfo::remote(
        "team-drive",
        "Team Drive",
        "https://switchboard.powerhouse.xyz/d/team-drive",
    )))?;

    let file = |id: &str, label: &str, drive_id: &str, document_type: &str| {
        let node = Node::file(id, label, drive_id).with_document_type(document_type);
        let document = Document {
            id: id.to_string(),
            name: label.to_string(),
            document_type: document_type.to_string(),
            revision: 1,
        };
        (node, Some(document))
    };

    server.add_node(Node::folder("reports", "Reports", "my-drive"), None)?;
    let (node, document) = file("budget", "Budget 2024.phdm", "my-drive", "powerhouse/budget-statement");
    server.add_node(node.with_parent("reports"), document)?;
    let (node, document) = file("portfolio", "RWA Portfolio.phdm", "my-drive", "makerdao/rwa-portfolio");
    server.add_node(node, document)?;
    let (node, document) = file("scope", "Scope Framework.phdm", "team-drive", "powerhouse/scope-framework");
    server.add_node(node, document)?;
    // File whose document has not been synced yet
    server.add_node(Node::file("draft", "Draft.phdm", "team-drive"), None)?;

    Ok(server)
}

/// Console front end over the file item and settings controllers
pub struct App {
    config: Arc<ConfigStore>,
    i18n: Arc<I18n>,
    server: Arc<DocumentDriveServer>,
    modals: Arc<ConsoleModals>,
    item_services: FileItemServices,
    settings_services: SettingsServices,
    drive_id: Option<String>,
    items: Vec<FileItem>,
    settings: Option<SettingsModal>,
    opened: Arc<Mutex<Option<(String, String)>>>,
}

impl App {
    pub fn new(
        config: Arc<ConfigStore>,
        i18n: Arc<I18n>,
        server: Arc<DocumentDriveServer>,
        switchboard: Arc<dyn SwitchboardOpener>,
    ) -> Self {
        let modals = Arc::new(ConsoleModals::default());

        let item_services = FileItemServices::new(
            server.clone(),
            server.clone(),
            server.clone(),
            switchboard,
            modals.clone(),
            Arc::new(ConfigPermissions::new(config.clone())),
        );
        // Snapshots may hold documents of models the application does not ship
        let catalog = DocumentModelCatalog::new(builtin_models(), config.clone());
        let known = catalog.document_models();
        for document_type in server.document_types() {
            if !known.iter().any(|m| m.id == document_type) {
                catalog.register(DocumentModel::new(&document_type, &document_type));
            }
        }

        let settings_services = SettingsServices {
            models: Arc::new(catalog),
            flags: config.clone(),
            storage: server.clone(),
            modals: modals.clone(),
        };

        let drive_id = server.drives().first().map(|d| d.id.clone());
        let mut app = Self {
            config,
            i18n,
            server,
            modals,
            item_services,
            settings_services,
            drive_id,
            items: Vec::new(),
            settings: None,
            opened: Arc::new(Mutex::new(None)),
        };
        app.refresh();
        app
    }

    /// Read commands from stdin until `quit` or end of input
    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = std::io::stdout();

        writeln!(stdout, "DriveExplorer - type 'help' for commands")?;
        self.execute(ShellCommand::List, &mut stdout).await?;

        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<ShellCommand>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(stdout, "{}", e)?;
                    continue;
                }
            };

            match self.execute(command, &mut stdout).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => writeln!(stdout, "Error: {}", e)?,
            }
        }

        tracing::info!("Shell closed");
        Ok(())
    }

    /// Rebuild the file items of the current drive
    fn refresh(&mut self) {
        let Some(drive_id) = self.drive_id.clone() else {
            self.items.clear();
            return;
        };

        // Items receive the drive reference as it appears in routes
        let drive_ref = urlencoding::encode(&drive_id).into_owned();
        self.items = self
            .server
            .nodes(&drive_id)
            .into_iter()
            .filter(|node| node.is_file())
            .map(|node| {
                let opened = Arc::clone(&self.opened);
                FileItem::new(node, &drive_ref, self.item_services.clone(), move |drive_id: &str, node_id: &str| {
                    *opened.lock() = Some((drive_id.to_string(), node_id.to_string()));
                })
            })
            .collect();

        tracing::debug!("{} file items in {}", self.items.len(), drive_id);
    }

    fn item(&self, index: usize) -> Result<&FileItem> {
        index
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
            .ok_or_else(|| anyhow!("No item #{} (see 'ls')", index))
    }

    fn open_settings(&self) -> Result<&SettingsModal> {
        self.settings
            .as_ref()
            .filter(|s| s.is_open())
            .ok_or_else(|| anyhow!("Settings are not open (see 'settings')"))
    }

    fn list(&self, out: &mut dyn Write) -> Result<()> {
        let Some(drive_id) = &self.drive_id else {
            writeln!(out, "No drive selected")?;
            return Ok(());
        };
        if self.items.is_empty() {
            writeln!(out, "{} is empty", drive_id)?;
        }

        for (i, item) in self.items.iter().enumerate() {
            let editing = if item.mode().is_write() { " (renaming)" } else { "" };
            writeln!(out, "{:>3}. {}{}", i + 1, item.title(), editing)?;
            writeln!(out, "     {}", item.subtitle())?;
        }
        Ok(())
    }

    /// Execute one command; returns `false` when the shell should exit
    pub async fn execute(&mut self, command: ShellCommand, out: &mut dyn Write) -> Result<bool> {
        match command {
            ShellCommand::Help => writeln!(out, "{}", HELP)?,
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Drives => {
                for info in self.server.drives() {
                    let current = if self.drive_id.as_deref() == Some(info.id.as_str()) { "*" } else { " " };
                    let remote = info.remote_url.as_deref().unwrap_or("local");
                    writeln!(out, "{} {} ({}) {}", current, info.name, info.id, remote)?;
                }
            }
            ShellCommand::Use(drive_id) => {
                if self.server.drive_info(&drive_id).is_none() {
                    bail!("Unknown drive {}", drive_id);
                }
                self.drive_id = Some(drive_id);
                self.refresh();
                self.list(out)?;
            }
            ShellCommand::List => self.list(out)?,
            ShellCommand::Menu(index) => {
                let item = self.item(index)?;
                let entries = item.menu_entries(&self.i18n);
                if !item.options_enabled() {
                    writeln!(out, "(busy)")?;
                } else if entries.is_empty() {
                    writeln!(out, "(no options)")?;
                }
                for entry in entries {
                    writeln!(out, "  {:<18} {}", entry.id, entry.label)?;
                }
            }
            ShellCommand::Option { item, option } => {
                let outcome = self.item(item)?.on_options_click(&option).await;
                match outcome {
                    ClickOutcome::Ignored => writeln!(out, "Option {} is not available", option)?,
                    ClickOutcome::Busy => writeln!(out, "Still busy, try again")?,
                    ClickOutcome::Failed { retryable: true } => {
                        writeln!(out, "Option {} failed, try again", option)?
                    }
                    ClickOutcome::Failed { retryable: false } => {
                        writeln!(out, "Option {} failed, see the log", option)?
                    }
                    ClickOutcome::Done(Dispatched::Duplicated) => {
                        self.refresh();
                        self.list(out)?;
                    }
                    ClickOutcome::Done(Dispatched::EditStarted) => {
                        writeln!(out, "Renaming, use 'rename {} <name>' or 'cancel {}'", item, item)?
                    }
                    ClickOutcome::Done(Dispatched::LinkOpened) => writeln!(out, "Opened in browser")?,
                    ClickOutcome::Done(Dispatched::NoDocument) => {
                        writeln!(out, "Nothing to open yet")?
                    }
                    ClickOutcome::Done(Dispatched::DeleteRequested) => {}
                }
            }
            ShellCommand::Open(index) => {
                let item = self.item(index)?;
                if item.on_click() {
                    writeln!(out, "Opened {}", item.title())?;
                } else {
                    writeln!(out, "{} is being renamed", item.title())?;
                }
            }
            ShellCommand::Rename { item, name } => {
                let item = self.item(item)?;
                if !item.mode().is_write() {
                    writeln!(out, "{} is not being renamed", item.title())?;
                }
                item.on_submit_input(&name);
                self.list(out)?;
            }
            ShellCommand::Cancel(index) => {
                self.item(index)?.on_cancel_input();
                self.list(out)?;
            }
            ShellCommand::Settings => self.modals.show(Modal::Settings),
            ShellCommand::Select(ids) => {
                let settings = self.open_settings()?;
                let options = settings.options();
                for id in ids.iter().filter(|id| !options.iter().any(|o| &o.value == *id)) {
                    writeln!(out, "Unknown document type {}", id)?;
                }

                settings.set_selected(options.into_iter().filter(|o| ids.contains(&o.value)).collect());
                writeln!(out, "Selected: {}", settings.selection_summary())?;
            }
            ShellCommand::Save => {
                self.open_settings()?.save();
                self.settings = None;
                writeln!(out, "Settings saved")?;
            }
            ShellCommand::Close => {
                self.open_settings()?.on_open_change(false);
                self.settings = None;
            }
            ShellCommand::ClearStorage => self.open_settings()?.request_clear_storage(),
            ShellCommand::Yes => self.confirm(out).await?,
            ShellCommand::No => self.dismiss(out)?,
            ShellCommand::Language(locale) => {
                if !self.i18n.set_locale(&locale) {
                    writeln!(out, "No translation for {}, using {}", locale, self.i18n.current_locale())?;
                }
                let current = self.i18n.current_locale();
                self.config.update(|config| config.general.language = current)?;
            }
        }

        self.sync_modals(out)?;
        Ok(true)
    }

    /// Render a newly shown modal; a shown settings modal opens a fresh controller
    fn sync_modals(&mut self, out: &mut dyn Write) -> Result<()> {
        let Some(modal) = self.modals.take_fresh() else {
            return Ok(());
        };

        match modal {
            Modal::Settings => {
                self.modals.take();
                let settings = SettingsModal::new(self.settings_services.clone(), self.i18n.clone());
                console::render_settings(&settings, out)?;
                self.settings = Some(settings);
            }
            other => console::render_modal(&other, &self.i18n, out)?,
        }
        Ok(())
    }

    async fn confirm(&mut self, out: &mut dyn Write) -> Result<()> {
        match self.modals.take() {
            Some(Modal::DeleteItem(modal)) => {
                match self.server.delete_node(&modal.drive_id, &modal.item_id) {
                    Ok(_) => writeln!(out, "Deleted {}", modal.item_name)?,
                    Err(e) => {
                        tracing::error!("Failed to delete {}: {}", modal.item_id, e);
                        let e = AppError::from(e);
                        writeln!(out, "Could not delete {}: {}", modal.item_name, e.user_message())?;
                    }
                }
                self.refresh();
                self.list(out)?;
            }
            Some(Modal::Confirmation(modal)) => match modal.intent {
                ConfirmIntent::ClearStorage => {
                    let settings = self
                        .settings
                        .as_ref()
                        .ok_or_else(|| anyhow!("Settings are not open"))?;
                    if let Err(e) = settings.confirm_clear_storage().await {
                        tracing::error!("Clear storage task failed: {}", e);
                    }

                    self.drive_id = self.server.drives().first().map(|d| d.id.clone());
                    self.refresh();
                }
            },
            Some(Modal::Settings) | None => writeln!(out, "Nothing to confirm")?,
        }
        Ok(())
    }

    fn dismiss(&mut self, out: &mut dyn Write) -> Result<()> {
        match self.modals.take() {
            Some(Modal::DeleteItem(modal)) => writeln!(out, "Kept {}", modal.item_name)?,
            Some(Modal::Confirmation(_)) => match &self.settings {
                Some(settings) => settings.cancel_clear_storage(),
                None => self.modals.show(Modal::Settings),
            },
            Some(Modal::Settings) | None => writeln!(out, "Nothing to dismiss")?,
        }
        Ok(())
    }

    /// Drive and node of the last opened item
    pub fn last_opened(&self) -> Option<(String, String)> {
        self.opened.lock().clone()
    }
}
