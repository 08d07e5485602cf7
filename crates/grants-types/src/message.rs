use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grant::SearchResult;
use crate::panel::{Panel, Role};

/// A single chat entry in one of a session's panel threads
///
/// Messages are immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: MessageContent,
    pub created_at: DateTime<Utc>,
    pub panel: Panel,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        role: Role,
        panel: Panel,
        content: MessageContent,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            content,
            created_at,
            panel,
        }
    }

    pub fn user(id: impl Into<String>, panel: Panel, text: impl Into<String>) -> Self {
        Self::new(id, Role::User, panel, MessageContent::text(text), Utc::now())
    }

    pub fn assistant(id: impl Into<String>, panel: Panel, content: MessageContent) -> Self {
        Self::new(id, Role::Assistant, panel, content, Utc::now())
    }

    pub fn system(id: impl Into<String>, panel: Panel, text: impl Into<String>) -> Self {
        Self::new(id, Role::System, panel, MessageContent::text(text), Utc::now())
    }
}

/// Body of a message, decided when the message is committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MessageContent {
    Text(String),
    /// Structured search results, rendered as result cards
    GrantResults(Vec<SearchResult>),
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text(text.into())
    }

    /// Interpret a serialized legacy message body.
    ///
    /// Older sessions stored search replies as the raw backend response
    /// serialized to text. An object carrying a `results` or `resultados`
    /// list of search results becomes [`MessageContent::GrantResults`];
    /// everything else is kept verbatim as text.
    pub fn from_legacy_text(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_legacy_value(value).unwrap_or_else(|| Self::text(raw)),
            Err(_) => Self::text(raw),
        }
    }

    /// Structured counterpart of [`MessageContent::from_legacy_text`]
    pub fn from_legacy_value(value: Value) -> Option<Self> {
        let Value::Object(mut object) = value else {
            return None;
        };
        let list = object
            .remove("resultados")
            .or_else(|| object.remove("results"))?;
        let Value::Array(rows) = &list else {
            return None;
        };
        // Every row must look like a grant, not a stored document answer
        let grant_rows = rows.iter().all(|row| {
            row.get("numeroConvocatoria").is_some() || row.get("estado").is_some()
        });
        if !grant_rows {
            return None;
        }
        serde_json::from_value::<Vec<SearchResult>>(list)
            .ok()
            .map(MessageContent::GrantResults)
    }

    /// Plain-text projection for consumers that cannot render cards
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::GrantResults(results) if results.is_empty() => {
                "No se encontraron resultados".to_string()
            }
            MessageContent::GrantResults(results) => {
                format!("Resultados de búsqueda ({})", results.len())
            }
        }
    }

    pub fn grant_results(&self) -> Option<&[SearchResult]> {
        match self {
            MessageContent::GrantResults(results) => Some(results),
            MessageContent::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_text_with_result_list_becomes_cards() {
        let raw = r#"{"resultados":[{"numeroConvocatoria":"1","descripcion":"Ayuda","estado":"abierta"}]}"#;

        let content = MessageContent::from_legacy_text(raw);
        let results = content.grant_results().expect("grant results");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].description, "Ayuda");
    }

    #[test]
    fn test_legacy_empty_result_list_is_still_structured() {
        let content = MessageContent::from_legacy_text(r#"{ "results": [] }"#);
        assert_eq!(content, MessageContent::GrantResults(vec![]));
        assert_eq!(content.as_text(), "No se encontraron resultados");
    }

    #[test]
    fn test_legacy_plain_text_stays_text() {
        let raw = "Respuesta simulada de búsqueda para: \"vivienda\"";
        assert_eq!(MessageContent::from_legacy_text(raw), MessageContent::text(raw));

        let quoted_json = "\"just a string\"";
        assert_eq!(
            MessageContent::from_legacy_text(quoted_json),
            MessageContent::text(quoted_json)
        );
    }

    #[test]
    fn test_legacy_document_answer_stays_text() {
        let raw = r#"{"resultados":[{"respuesta":"El plazo es de 30 días"}]}"#;
        assert_eq!(MessageContent::from_legacy_text(raw), MessageContent::text(raw));
    }

    #[test]
    fn test_content_is_tagged_on_the_wire() {
        let value = serde_json::to_value(MessageContent::text("hola")).unwrap();
        assert_eq!(value["kind"], "text");
        assert_eq!(value["value"], "hola");
    }
}
