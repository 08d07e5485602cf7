use async_trait::async_trait;
use grants_types::GrantDocuments;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{BackendError, Result};
use crate::traits::GrantBackend;
use crate::types::{DocumentQuestionResponse, SearchResponse};

/// A call received by [`MockBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Search(String),
    Document(String),
    Documents(String),
}

struct Scripted<T> {
    delay: Duration,
    reply: std::result::Result<T, String>,
}

/// In-process responder standing in for the relay
///
/// Scripted replies are consumed in order per endpoint, each after its own
/// delay. With nothing scripted it answers like the relay's mock mode: an
/// empty result list for searches and an echo for document questions.
#[derive(Default)]
pub struct MockBackend {
    search: Mutex<VecDeque<Scripted<SearchResponse>>>,
    document: Mutex<VecDeque<Scripted<DocumentQuestionResponse>>>,
    documents: Mutex<VecDeque<Scripted<GrantDocuments>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_search(&self, reply: SearchResponse, delay: Duration) {
        push(&self.search, Ok(reply), delay);
    }

    pub fn fail_search(&self, error: impl Into<String>, delay: Duration) {
        push(&self.search, Err(error.into()), delay);
    }

    pub fn push_document(&self, reply: DocumentQuestionResponse, delay: Duration) {
        push(&self.document, Ok(reply), delay);
    }

    pub fn fail_document(&self, error: impl Into<String>, delay: Duration) {
        push(&self.document, Err(error.into()), delay);
    }

    pub fn push_documents(&self, reply: GrantDocuments, delay: Duration) {
        push(&self.documents, Ok(reply), delay);
    }

    /// Calls received so far, in arrival order
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: MockCall) {
        lock(&self.calls).push(call);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn push<T>(queue: &Mutex<VecDeque<Scripted<T>>>, reply: std::result::Result<T, String>, delay: Duration) {
    lock(queue).push_back(Scripted { delay, reply });
}

async fn play<T>(queue: &Mutex<VecDeque<Scripted<T>>>, fallback: impl FnOnce() -> T) -> Result<T> {
    let next = lock(queue).pop_front();
    match next {
        Some(scripted) => {
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            scripted.reply.map_err(BackendError::Unavailable)
        }
        None => Ok(fallback()),
    }
}

#[async_trait]
impl GrantBackend for MockBackend {
    async fn search_grants(&self, query: &str) -> Result<SearchResponse> {
        self.record(MockCall::Search(query.to_string()));
        play(&self.search, || SearchResponse::with_results(Vec::new())).await
    }

    async fn ask_document(&self, question: &str) -> Result<DocumentQuestionResponse> {
        self.record(MockCall::Document(question.to_string()));
        play(&self.document, || {
            DocumentQuestionResponse::answered(format!(
                "Respuesta simulada para análisis de documento: \"{}\"",
                question
            ))
        })
        .await
    }

    async fn grant_documents(&self, grant_id: &str) -> Result<GrantDocuments> {
        self.record(MockCall::Documents(grant_id.to_string()));
        play(&self.documents, || GrantDocuments {
            documents: Vec::new(),
            zip: None,
        })
        .await
    }
}
