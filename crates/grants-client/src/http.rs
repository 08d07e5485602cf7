use async_trait::async_trait;
use grants_types::GrantDocuments;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::BackendConfig;
use crate::error::{BackendError, Result};
use crate::traits::GrantBackend;
use crate::types::{DocumentQuestionRequest, DocumentQuestionResponse, SearchRequest, SearchResponse};

/// HTTP client for the grant search and document question services
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Check the response status and decode the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            tracing::debug!("Backend request successful: {}", status);
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());

            tracing::error!(
                "Backend request failed: status={}, body={}",
                status,
                body
            );

            Err(BackendError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl GrantBackend for HttpBackend {
    async fn search_grants(&self, query: &str) -> Result<SearchResponse> {
        let url = self.config.search_url();
        tracing::debug!(url = %url, "Searching grants");

        let response = self
            .client
            .post(&url)
            .json(&SearchRequest {
                query: query.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn ask_document(&self, question: &str) -> Result<DocumentQuestionResponse> {
        let url = self.config.document_url();
        tracing::debug!(url = %url, "Asking document question");

        let response = self
            .client
            .post(&url)
            .json(&DocumentQuestionRequest {
                question: question.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn grant_documents(&self, grant_id: &str) -> Result<GrantDocuments> {
        let valid = !grant_id.is_empty()
            && grant_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(BackendError::InvalidRequest(format!(
                "invalid grant id: {:?}",
                grant_id
            )));
        }

        let url = self.config.documents_url(grant_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
