//! # Grants
//!
//! Session and panel-state engine for a conversational front-end over public
//! grant ("subvención") listings.
//!
//! ## Overview
//!
//! A session bundles two independent threads, one per panel:
//!
//! - **Search** queries the grant lookup backend and stores the results as
//!   structured cards
//! - **Document** asks retrieval-augmented questions about uploaded files
//!
//! The [`ChatEngine`] owns every session, commits user messages immediately,
//! and commits backend replies in completion order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grants::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = grants::http_engine("http://localhost:8000")?;
//!     engine.ensure_session();
//!
//!     let text = Submission::new("Busca ayudas para vivienda en Madrid").expect("non-blank");
//!     match engine.dispatch(text, Panel::Search).await {
//!         DispatchOutcome::Replied { message } => println!("{}", message.content.as_text()),
//!         other => println!("{:?}", other),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`grants-types`**: sessions, messages, files, search results, legacy records
//! - **`grants-client`**: the backend trait with HTTP and scripted implementations
//! - **`grants-session`**: store, migration, file intake, dispatcher and engine
//!
//! ## License
//!
//! MIT

pub mod prelude;

use std::sync::Arc;

pub use grants_types::{
    derive_title, format_amount, format_file_size, FileHandle, FileRecord, GrantDocument, GrantDocuments,
    GrantStatus, IdClock, Message, MessageContent, MessageRecord, Panel, Role, SearchResult, Session,
    SessionRecord, SessionSummary, UploadedFile, DEFAULT_TITLE,
};

pub use grants_client::{
    BackendConfig, BackendError, DocumentQuestionResponse, GrantBackend, HttpBackend, MockBackend, MockCall,
    SearchResponse,
};

pub use grants_session::{
    migrate, ChatEngine, ChatEngineBuilder, DispatchOutcome, EngineConfig, SessionError, SessionStore,
    Submission,
};

/// Engine talking to the relay at `base_url` with default settings
pub fn http_engine(base_url: impl Into<String>) -> anyhow::Result<ChatEngine> {
    let backend = HttpBackend::new(BackendConfig::new(base_url))?;
    let engine = ChatEngine::builder().backend(Arc::new(backend)).build()?;
    Ok(engine)
}

/// Engine backed by an in-process [`MockBackend`], returned alongside for scripting
pub fn mock_engine() -> anyhow::Result<(ChatEngine, Arc<MockBackend>)> {
    let backend = Arc::new(MockBackend::new());
    let engine = ChatEngine::builder().backend(backend.clone()).build()?;
    Ok((engine, backend))
}
