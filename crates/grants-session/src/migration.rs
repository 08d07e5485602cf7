//! One-time normalization of sessions loaded in an older shape
//!
//! Older sessions kept a single combined `messages` thread together with a
//! `phase` flag. [`migrate`] turns such a record, or any partially filled
//! record, into a dual-thread [`Session`]. It never fails and never drops a
//! message: every legacy message lands in exactly one thread. A missing or
//! blank title becomes the caller's configured default title.

use chrono::{DateTime, TimeZone, Utc};
use grants_types::{
    FileRecord, Message, MessageContent, MessageRecord, Panel, Role, Session, SessionRecord,
    UploadedFile,
};
use serde_json::Value;
use std::collections::HashSet;

/// Normalize a loaded record into the dual-thread session shape
pub fn migrate(record: SessionRecord, default_title: &str) -> Session {
    let created_at = parse_time(record.created_at.as_deref()).unwrap_or_default();
    let title = record
        .title
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| default_title.to_string());
    let active_panel = record
        .phase
        .as_deref()
        .and_then(|phase| phase.parse::<Panel>().ok())
        .unwrap_or_default();

    let legacy = record.messages.unwrap_or_default();

    let search_messages = match record.search_messages {
        Some(records) => convert_thread(records, Panel::Search, created_at),
        None => derive_thread(&legacy, Panel::Search, created_at),
    };
    let document_messages = match record.document_messages {
        Some(records) => convert_thread(records, Panel::Document, created_at),
        None => derive_thread(&legacy, Panel::Document, created_at),
    };

    let uploaded_files = convert_files(record.uploaded_files.unwrap_or_default(), created_at);

    Session {
        id: record.id,
        title,
        created_at,
        active_panel,
        search_messages,
        document_messages,
        uploaded_files,
    }
}

/// Panel a legacy message belongs to; anything not tagged `document` is search
fn legacy_panel(record: &MessageRecord) -> Panel {
    match record.phase.as_deref().map(str::parse::<Panel>) {
        Some(Ok(Panel::Document)) => Panel::Document,
        _ => Panel::Search,
    }
}

fn derive_thread(legacy: &[MessageRecord], panel: Panel, fallback: DateTime<Utc>) -> Vec<Message> {
    legacy
        .iter()
        .enumerate()
        .filter(|(_, record)| legacy_panel(record) == panel)
        .map(|(index, record)| convert_message(record.clone(), panel, index, fallback))
        .collect()
}

fn convert_thread(records: Vec<MessageRecord>, panel: Panel, fallback: DateTime<Utc>) -> Vec<Message> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| convert_message(record, panel, index, fallback))
        .collect()
}

fn convert_message(record: MessageRecord, panel: Panel, index: usize, fallback: DateTime<Utc>) -> Message {
    let id = if record.id.is_empty() {
        format!("legacy-{}-{}", panel, index)
    } else {
        record.id
    };
    let role = record
        .role
        .as_deref()
        .and_then(|role| role.parse::<Role>().ok())
        .unwrap_or(Role::System);
    let created_at = parse_time(record.timestamp.as_deref()).unwrap_or(fallback);

    Message::new(id, role, panel, convert_content(record.content), created_at)
}

fn convert_content(content: Option<Value>) -> MessageContent {
    match content {
        None | Some(Value::Null) => MessageContent::text(""),
        Some(Value::String(raw)) => MessageContent::from_legacy_text(&raw),
        Some(value) => {
            let raw = value.to_string();
            MessageContent::from_legacy_value(value).unwrap_or_else(|| MessageContent::text(raw))
        }
    }
}

fn convert_files(records: Vec<FileRecord>, fallback: DateTime<Utc>) -> Vec<UploadedFile> {
    // Replacement ids must not collide with real ids that appear later in the list
    let mut taken: HashSet<String> = records
        .iter()
        .filter(|record| !record.id.is_empty())
        .map(|record| record.id.clone())
        .collect();
    let mut seen = HashSet::new();

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let id = if record.id.is_empty() || seen.contains(&record.id) {
                let mut candidate = format!("legacy-file-{}", index);
                let mut attempt = 0;
                while taken.contains(&candidate) {
                    attempt += 1;
                    candidate = format!("legacy-file-{}-{}", index, attempt);
                }
                taken.insert(candidate.clone());
                candidate
            } else {
                record.id
            };
            seen.insert(id.clone());

            let last_modified = record
                .last_modified
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
                .unwrap_or(fallback);
            let uploaded_at = parse_time(record.uploaded_at.as_deref()).unwrap_or(fallback);

            UploadedFile::metadata_only(id, record.name, record.size, record.mime_type, last_modified, uploaded_at)
        })
        .collect()
}

fn parse_time(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|time| time.with_timezone(&Utc))
}
