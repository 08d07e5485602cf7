use async_trait::async_trait;
use grants_types::GrantDocuments;

use crate::error::Result;
use crate::types::{DocumentQuestionResponse, SearchResponse};

/// The collaborator services the chat engine talks to
///
/// Implementations only move data; deciding what a reply looks like in a
/// thread belongs to the dispatcher.
#[async_trait]
pub trait GrantBackend: Send + Sync {
    /// Look up grant calls matching a free-text query
    async fn search_grants(&self, query: &str) -> Result<SearchResponse>;

    /// Ask a question against the documents the backend already holds
    async fn ask_document(&self, question: &str) -> Result<DocumentQuestionResponse>;

    /// List the documents attached to a grant call
    async fn grant_documents(&self, grant_id: &str) -> Result<GrantDocuments>;
}
