use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A file handed to the intake by the user, before it becomes part of a session
#[derive(Debug, Clone)]
pub struct FileHandle {
    pub name: String,
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    pub bytes: Vec<u8>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            last_modified: Utc::now(),
            bytes,
        }
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = last_modified;
        self
    }
}

/// Metadata of an uploaded file together with its payload
///
/// The payload is never serialized; it is only reachable through
/// [`UploadedFile::payload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip, default = "empty_payload")]
    payload: Arc<[u8]>,
}

fn empty_payload() -> Arc<[u8]> {
    Arc::from(Vec::new())
}

impl UploadedFile {
    pub fn from_handle(id: impl Into<String>, handle: FileHandle, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: handle.name,
            size: handle.bytes.len() as u64,
            mime_type: handle.mime_type,
            last_modified: handle.last_modified,
            uploaded_at,
            payload: Arc::from(handle.bytes),
        }
    }

    /// Metadata-only record, as restored from an older session
    pub fn metadata_only(
        id: impl Into<String>,
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        last_modified: DateTime<Utc>,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            last_modified,
            uploaded_at,
            payload: empty_payload(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn has_payload(&self) -> bool {
        !self.payload.is_empty()
    }

    /// Icon hint used by file cards
    pub fn kind_icon(&self) -> &'static str {
        let mime = self.mime_type.as_str();
        if mime.contains("pdf") {
            "📄"
        } else if mime.contains("word") || mime.contains("document") {
            "📝"
        } else if mime.contains("text") {
            "📃"
        } else {
            "📁"
        }
    }
}

impl PartialEq for UploadedFile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.size == other.size
            && self.mime_type == other.mime_type
            && self.last_modified == other.last_modified
            && self.uploaded_at == other.uploaded_at
            && self.payload[..] == other.payload[..]
    }
}
