use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Location and timeouts of the backend services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub search_path: String,
    pub document_path: String,
    /// Path template; `{id}` is replaced by the grant id
    pub documents_path: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: "/convocatorias".to_string(),
            document_path: "/preguntar_rag".to_string(),
            documents_path: "/grant/{id}/documents".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_search_path(mut self, path: impl Into<String>) -> Self {
        self.search_path = path.into();
        self
    }

    pub fn with_document_path(mut self, path: impl Into<String>) -> Self {
        self.document_path = path.into();
        self
    }

    pub fn with_documents_path(mut self, template: impl Into<String>) -> Self {
        self.documents_path = template.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn search_url(&self) -> String {
        self.join(&self.search_path)
    }

    pub fn document_url(&self) -> String {
        self.join(&self.document_path)
    }

    pub fn documents_url(&self, grant_id: &str) -> String {
        self.join(&self.documents_path.replace("{id}", grant_id))
    }

    fn join(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
