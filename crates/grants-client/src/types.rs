use grants_types::{MessageContent, SearchResult};
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, Result};

/// Reply text used when the document backend returns neither an answer nor an error
pub const NO_ANSWER: &str = "No se obtuvo respuesta del documento.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "texto")]
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "resultados", alias = "results", default)]
    pub results: Option<Vec<SearchResult>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results: Some(results),
            error: None,
        }
    }

    /// The result list, or the reason the backend gave for not having one
    pub fn into_results(self) -> Result<Vec<SearchResult>> {
        match (self.results, self.error) {
            (Some(results), _) => Ok(results),
            (None, Some(error)) => Err(BackendError::Rejected(error)),
            (None, None) => Err(BackendError::Malformed(
                "search response has no result list".to_string(),
            )),
        }
    }

    /// Content of the assistant reply; an error-only response is shown as text
    pub fn into_reply(self) -> Result<MessageContent> {
        match (self.results, self.error) {
            (Some(results), _) => Ok(MessageContent::GrantResults(results)),
            (None, Some(error)) => Ok(MessageContent::Text(error)),
            (None, None) => Err(BackendError::Malformed(
                "search response has no result list".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentQuestionRequest {
    #[serde(rename = "pregunta")]
    pub question: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentQuestionResponse {
    #[serde(rename = "resultados", alias = "results", default)]
    pub results: Vec<AnswerItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerItem {
    #[serde(rename = "respuesta", alias = "answer", default)]
    pub answer: Option<String>,
}

impl DocumentQuestionResponse {
    pub fn answered(answer: impl Into<String>) -> Self {
        Self {
            results: vec![AnswerItem {
                answer: Some(answer.into()),
            }],
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// First answer, falling back to the error field, then to [`NO_ANSWER`]
    pub fn answer_text(&self) -> String {
        self.results
            .first()
            .and_then(|item| item.answer.as_deref())
            .filter(|answer| !answer.is_empty())
            .or_else(|| self.error.as_deref().filter(|error| !error.is_empty()))
            .unwrap_or(NO_ANSWER)
            .to_string()
    }
}
