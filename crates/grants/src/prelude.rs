//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use grants::prelude::*;
//! ```

pub use crate::{
    ChatEngine, ChatEngineBuilder, DispatchOutcome, EngineConfig, Submission,
    GrantBackend, HttpBackend, MockBackend, BackendConfig, BackendError,
    Message, MessageContent, Panel, Role, Session, SessionSummary, SearchResult, FileHandle, UploadedFile,
};
