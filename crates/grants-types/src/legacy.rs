//! Session shapes as they arrive at the load boundary.
//!
//! Older sessions kept a single combined `messages` list and one `phase`
//! flag; newer ones already carry both panel threads. Every field is
//! optional so that a partial or damaged record still deserializes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// RFC 3339 timestamp; unparseable values are ignored
    #[serde(default)]
    pub created_at: Option<String>,
    /// Legacy single-panel flag (`search` | `document`)
    #[serde(default)]
    pub phase: Option<String>,
    /// Legacy combined thread
    #[serde(default)]
    pub messages: Option<Vec<MessageRecord>>,
    #[serde(default)]
    pub search_messages: Option<Vec<MessageRecord>>,
    #[serde(default)]
    pub document_messages: Option<Vec<MessageRecord>>,
    #[serde(default)]
    pub uploaded_files: Option<Vec<FileRecord>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", alias = "role", default)]
    pub role: Option<String>,
    /// Text, or a structured body written by a newer client
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    /// Unix milliseconds
    #[serde(default)]
    pub last_modified: Option<i64>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}
