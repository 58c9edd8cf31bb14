//! Sync a note to its Confluence page, and register new connections.
//!
//! Both flows identify the note by the `uniqueId` in its front matter, so a
//! renamed or moved note keeps its page.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::confluence::ConfluenceClient;
use crate::error::{ConfluenceError, SyncError};
use crate::models::SettingsRepository;
use crate::notes::frontmatter;
use crate::notes::identity::ensure_unique_id;
use crate::notes::Note;
use crate::notify::{Notice, Notifier};

pub const NO_CONNECTION_MESSAGE: &str = "No confluence connection found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No note to act on; nothing happened
    NoActiveNote,
    /// The note has no page id yet; no request was made
    NotConnected { unique_id: String },
    Synced { page_id: String },
    /// Confluence refused the update
    Rejected { page_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    NoActiveNote,
    /// The prompt was dismissed without a page id
    Cancelled,
    Connected { unique_id: String, page_id: String },
}

pub struct SyncService {
    settings: SettingsRepository,
    notifier: Arc<dyn Notifier>,
    http_timeout: Option<Duration>,
}

impl SyncService {
    pub fn new(
        settings: SettingsRepository,
        notifier: Arc<dyn Notifier>,
        http_timeout: Option<Duration>,
    ) -> Self {
        Self {
            settings,
            notifier,
            http_timeout,
        }
    }

    pub fn settings(&self) -> &SettingsRepository {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsRepository {
        &mut self.settings
    }

    /// Push the note's content (minus its identifier) to the connected page.
    pub async fn sync_note(&mut self, active_note: Option<&Path>) -> Result<SyncOutcome, SyncError> {
        let Some(path) = active_note else {
            log::debug!("[SYNC] No active note, nothing to sync");
            return Ok(SyncOutcome::NoActiveNote);
        };

        let mut note = Note::load(path)?;
        let unique_id = ensure_unique_id(&mut note, &mut self.settings)?;

        let Some(page_id) = self
            .settings
            .mapping()
            .connected_page(&unique_id)
            .map(str::to_string)
        else {
            log::info!("[SYNC] {:?} ({}) is not connected to a page", path, unique_id);
            self.notifier.notify(&Notice::info(NO_CONNECTION_MESSAGE));
            return Ok(SyncOutcome::NotConnected { unique_id });
        };

        let text = frontmatter::strip_identifier(&note.content);
        log::info!("[SYNC] Syncing {:?} to page {}", path, page_id);

        match self.push(&page_id, &text, &note.title).await {
            Ok(true) => {
                self.notifier.notify(&Notice::info(format!(
                    "Synced '{}' to Confluence page {}",
                    note.title, page_id
                )));
                Ok(SyncOutcome::Synced { page_id })
            }
            Ok(false) => {
                self.notifier.notify(&Notice::error(format!(
                    "Failed to sync '{}': Confluence rejected the update to page {}",
                    note.title, page_id
                )));
                Ok(SyncOutcome::Rejected { page_id })
            }
            Err(e) => {
                self.notifier
                    .notify(&Notice::error(format!("Failed to sync '{}': {}", note.title, e)));
                Err(e.into())
            }
        }
    }

    async fn push(&self, page_id: &str, text: &str, title: &str) -> Result<bool, ConfluenceError> {
        let client = ConfluenceClient::from_settings(self.settings.settings(), self.http_timeout)?;
        client.replace_document(page_id, text, title).await
    }

    /// Bind the note to `page_id`. The id is not checked against Confluence;
    /// a bad id shows up on the next sync.
    pub fn connect(
        &mut self,
        active_note: Option<&Path>,
        page_id: &str,
    ) -> Result<ConnectOutcome, SyncError> {
        let Some(path) = active_note else {
            log::debug!("[SYNC] No active note, nothing to connect");
            return Ok(ConnectOutcome::NoActiveNote);
        };

        let page_id = page_id.trim();
        if page_id.is_empty() {
            self.notifier
                .notify(&Notice::info("No page id entered, connection not created"));
            return Ok(ConnectOutcome::Cancelled);
        }

        let mut note = Note::load(path)?;
        let unique_id = ensure_unique_id(&mut note, &mut self.settings)?;
        self.settings.set_page(&unique_id, page_id)?;

        log::info!("[SYNC] Connected {:?} ({}) to page {}", path, unique_id, page_id);
        self.notifier.notify(&Notice::info(format!(
            "Connected '{}' to Confluence page {}",
            note.title, page_id
        )));

        Ok(ConnectOutcome::Connected {
            unique_id,
            page_id: page_id.to_string(),
        })
    }
}
