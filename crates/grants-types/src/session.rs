use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::file::UploadedFile;
use crate::message::Message;
use crate::panel::Panel;

/// Title every session starts with until its first user message
pub const DEFAULT_TITLE: &str = "Nueva Consulta";

/// A conversation context bundling both panel threads, the title and uploads
///
/// Mutations consume the value and hand back the next version, so a store can
/// swap whole sessions and observers never see a half-applied change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub active_panel: Panel,
    pub search_messages: Vec<Message>,
    pub document_messages: Vec<Message>,
    pub uploaded_files: Vec<UploadedFile>,
}

impl Session {
    /// Empty session showing the search panel
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_at,
            active_panel: Panel::Search,
            search_messages: Vec::new(),
            document_messages: Vec::new(),
            uploaded_files: Vec::new(),
        }
    }

    pub fn messages(&self, panel: Panel) -> &[Message] {
        match panel {
            Panel::Search => &self.search_messages,
            Panel::Document => &self.document_messages,
        }
    }

    /// Extend one thread by a single message, leaving everything else untouched
    pub fn append_to(mut self, panel: Panel, message: Message) -> Self {
        match panel {
            Panel::Search => self.search_messages.push(message),
            Panel::Document => self.document_messages.push(message),
        }
        self
    }

    pub fn with_active_panel(mut self, panel: Panel) -> Self {
        self.active_panel = panel;
        self
    }

    pub fn with_files(mut self, files: impl IntoIterator<Item = UploadedFile>) -> Self {
        self.uploaded_files.extend(files);
        self
    }

    /// Drop the file with `file_id`; unknown ids leave the session unchanged
    pub fn without_file(mut self, file_id: &str) -> Self {
        self.uploaded_files.retain(|file| file.id != file_id);
        self
    }

    pub fn file(&self, file_id: &str) -> Option<&UploadedFile> {
        self.uploaded_files.iter().find(|file| file.id == file_id)
    }

    pub fn has_default_title(&self, default_title: &str) -> bool {
        self.title == default_title
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            active_panel: self.active_panel,
            search_messages: self.search_messages.len(),
            document_messages: self.document_messages.len(),
            uploaded_files: self.uploaded_files.len(),
        }
    }
}

/// Sidebar entry for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub active_panel: Panel,
    pub search_messages: usize,
    pub document_messages: usize,
    pub uploaded_files: usize,
}

/// Title derived from the first user message: its first `max_chars`
/// characters followed by `ellipsis`
pub fn derive_title(text: &str, max_chars: usize, ellipsis: &str) -> String {
    let mut title: String = text.chars().take(max_chars).collect();
    title.push_str(ellipsis);
    title
}
