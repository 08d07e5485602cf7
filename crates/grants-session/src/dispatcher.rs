use grants_client::{BackendError, GrantBackend};
use grants_types::{Message, MessageContent, Panel};
use serde::{Deserialize, Serialize};

/// Non-blank user text, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission(String);

impl Submission {
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

/// How a dispatch settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The assistant reply was committed to the originating thread
    Replied { message: Message },
    /// The backend call failed; only the user message was committed
    Failed { reason: String },
    /// The session was deleted while the call was in flight
    SessionGone,
    NoActiveSession,
    SessionNotFound,
}

impl DispatchOutcome {
    pub fn reply(&self) -> Option<&Message> {
        match self {
            DispatchOutcome::Replied { message } => Some(message),
            _ => None,
        }
    }
}

/// Issue the single outbound call for `panel` and decide the reply content
pub async fn request_reply(
    backend: &dyn GrantBackend,
    panel: Panel,
    text: &str,
) -> Result<MessageContent, BackendError> {
    match panel {
        Panel::Search => {
            let response = backend.search_grants(text).await?;
            response.into_reply()
        }
        Panel::Document => {
            let response = backend.ask_document(text).await?;
            Ok(MessageContent::Text(response.answer_text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grants_client::{DocumentQuestionResponse, MockBackend, SearchResponse};
    use std::time::Duration;

    #[test]
    fn test_blank_submissions_are_refused() {
        assert!(Submission::new("").is_none());
        assert!(Submission::new("  \n\t").is_none());
        assert_eq!(Submission::new("  hola ").unwrap().text(), "hola");
    }

    #[tokio::test]
    async fn test_search_reply_is_structured() {
        let backend = MockBackend::new();
        backend.push_search(SearchResponse::with_results(vec![]), Duration::ZERO);

        let content = request_reply(&backend, Panel::Search, "vivienda").await.unwrap();
        assert_eq!(content, MessageContent::GrantResults(vec![]));
    }

    #[tokio::test]
    async fn test_search_error_without_results_is_text_reply() {
        let backend = MockBackend::new();
        backend.push_search(
            SearchResponse {
                results: None,
                error: Some("Texto no válido".to_string()),
            },
            Duration::ZERO,
        );

        let content = request_reply(&backend, Panel::Search, "x").await.unwrap();
        assert_eq!(content, MessageContent::text("Texto no válido"));
    }

    #[tokio::test]
    async fn test_unexpected_relay_status_still_replies() {
        let response: SearchResponse = serde_json::from_value(serde_json::json!({
            "resultados": [
                {
                    "numeroConvocatoria": 755001,
                    "descripcion": "Ayudas al alquiler",
                    "fechaRecepcion": "2024-03-01T00:00:00",
                    "nivel1": "MADRID",
                    "nivel2": "CONSEJERÍA DE VIVIENDA",
                    "presupuesto_total": null,
                    "inicio": "no info",
                    "final": "no info",
                    "bases": "https://example.org/bases",
                    "estado": "pendiente"
                },
                { "descripcion": "Fila sin número ni estado" }
            ]
        }))
        .unwrap();
        let backend = MockBackend::new();
        backend.push_search(response, Duration::ZERO);

        let content = request_reply(&backend, Panel::Search, "alquiler").await.unwrap();
        let results = match content {
            MessageContent::GrantResults(results) => results,
            other => panic!("expected grant results, got {:?}", other),
        };
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status.label(), "pendiente");
        assert_eq!(results[1].convocation_number, "");
        assert_eq!(results[1].status.label(), "");
    }

    #[tokio::test]
    async fn test_document_reply_is_text() {
        let backend = MockBackend::new();
        backend.push_document(DocumentQuestionResponse::answered("Sí"), Duration::ZERO);

        let content = request_reply(&backend, Panel::Document, "¿Puedo?").await.unwrap();
        assert_eq!(content, MessageContent::text("Sí"));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(DispatchOutcome::Failed {
            reason: "down".to_string(),
        })
        .unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["reason"], "down");
    }
}
