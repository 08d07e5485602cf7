use chrono::Utc;
use grants_client::{BackendError, GrantBackend};
use grants_types::{
    FileHandle, GrantDocuments, Message, Panel, SearchResult, Session, SessionRecord, SessionSummary,
    UploadedFile, derive_title,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::builder::ChatEngineBuilder;
use crate::config::EngineConfig;
use crate::dispatcher::{request_reply, DispatchOutcome, Submission};
use crate::error::{Result, SessionError};
use crate::intake;
use crate::store::SessionStore;

struct EngineState {
    store: SessionStore,
    /// Pending dispatches per session id
    in_flight: HashMap<String, usize>,
}

/// Session and panel-state engine
///
/// Owns the [`SessionStore`] and is the only way to mutate it. Every
/// operation takes the state lock briefly and never holds it across a
/// backend call, so other operations proceed while a dispatch is pending.
/// Cloning is cheap and clones share the same state.
#[derive(Clone)]
pub struct ChatEngine {
    inner: Arc<Mutex<EngineState>>,
    backend: Arc<dyn GrantBackend>,
}

impl ChatEngine {
    pub fn new(backend: Arc<dyn GrantBackend>, config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineState {
                store: SessionStore::new(config),
                in_flight: HashMap::new(),
            })),
            backend,
        }
    }

    pub fn builder() -> ChatEngineBuilder {
        ChatEngineBuilder::new()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn config(&self) -> EngineConfig {
        self.lock().store.config().clone()
    }

    pub fn create_session(&self) -> Session {
        self.lock().store.create_session()
    }

    /// Return the active session, creating or selecting one when needed
    ///
    /// An empty collection gets a fresh session; otherwise the newest
    /// session becomes active if none is.
    pub fn ensure_session(&self) -> Session {
        let mut state = self.lock();
        if let Some(active) = state.store.active() {
            return active;
        }

        let newest = state.store.sessions().first().map(|summary| summary.id.clone());
        match newest {
            Some(id) => match state.store.select_session(&id).cloned() {
                Some(session) => session,
                None => state.store.create_session(),
            },
            None => state.store.create_session(),
        }
    }

    pub fn select_session(&self, id: &str) -> Option<Session> {
        self.lock().store.select_session(id).cloned()
    }

    pub fn delete_session(&self, id: &str) -> bool {
        let mut state = self.lock();
        let removed = state.store.delete_session(id);
        if removed && state.in_flight.contains_key(id) {
            tracing::debug!(session_id = %id, "Deleted session has pending dispatches");
        }
        removed
    }

    pub fn import_session(&self, record: SessionRecord) -> String {
        self.lock().store.import(record)
    }

    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.lock().store.sessions()
    }

    pub fn active_id(&self) -> Option<String> {
        self.lock().store.active_id().map(str::to_string)
    }

    pub fn session(&self, id: &str) -> Option<Session> {
        self.lock().store.session(id)
    }

    pub fn active_session(&self) -> Option<Session> {
        self.lock().store.active()
    }

    fn require_active(&self) -> Result<String> {
        self.active_id().ok_or(SessionError::NoActiveSession)
    }

    fn update<F>(&self, id: &str, f: F) -> Result<Session>
    where
        F: FnOnce(Session) -> Session,
    {
        self.lock()
            .store
            .update(id, f)
            .cloned()
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))
    }

    /// Switch the panel of the active session
    pub fn set_active_panel(&self, panel: Panel) -> Result<Session> {
        let id = self.require_active()?;
        self.set_panel(&id, panel)
    }

    pub fn set_panel(&self, session_id: &str, panel: Panel) -> Result<Session> {
        tracing::debug!(session_id = %session_id, panel = %panel, "Panel switched");
        self.update(session_id, |session| session.with_active_panel(panel))
    }

    /// Announce a grant for detailed questions and move to the document panel
    pub fn select_grant(&self, grant: &SearchResult) -> Result<Session> {
        let id = self.require_active()?;
        self.select_grant_in(&id, grant)
    }

    pub fn select_grant_in(&self, session_id: &str, grant: &SearchResult) -> Result<Session> {
        let text = format!(
            "Has seleccionado \"{}\" para consultas detalladas. Ahora tengo acceso al documento completo de la ayuda. \
             Puedes hacerme preguntas específicas sobre elegibilidad, requisitos, plazos o cualquier otro detalle.",
            grant.description
        );

        let mut state = self.lock();
        let message = Message::system(state.store.next_id(), Panel::Document, text);
        let session = state
            .store
            .update(session_id, |session| {
                session
                    .append_to(Panel::Document, message)
                    .with_active_panel(Panel::Document)
            })
            .cloned()
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;

        tracing::info!(
            session_id = %session_id,
            grant = %grant.convocation_number,
            "Grant selected"
        );
        Ok(session)
    }

    /// File intake into the active session
    pub fn upload_files(&self, handles: Vec<FileHandle>) -> Result<Vec<UploadedFile>> {
        let id = self.require_active()?;
        self.upload_files_to(&id, handles)
    }

    pub fn upload_files_to(&self, session_id: &str, handles: Vec<FileHandle>) -> Result<Vec<UploadedFile>> {
        if handles.is_empty() {
            return Err(SessionError::EmptyUpload);
        }

        let mut state = self.lock();
        if state.store.session(session_id).is_none() {
            return Err(SessionError::SessionNotFound(session_id.to_string()));
        }

        let base = state.store.reserve_ids(handles.len());
        let records = intake::build_records(base, handles, Utc::now());
        let notice = if state.store.config().announce_uploads {
            intake::upload_notice(&records)
                .map(|text| Message::system(state.store.next_id(), Panel::Document, text))
        } else {
            None
        };

        let batch = records.clone();
        state
            .store
            .update(session_id, |session| intake::intake(session, batch, notice))
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;

        tracing::info!(session_id = %session_id, files = records.len(), "Files uploaded");
        Ok(records)
    }

    /// Remove a file from the active session; unknown ids are a no-op
    pub fn remove_file(&self, file_id: &str) -> Result<Session> {
        let id = self.require_active()?;
        self.remove_file_from(&id, file_id)
    }

    pub fn remove_file_from(&self, session_id: &str, file_id: &str) -> Result<Session> {
        self.update(session_id, |session| session.without_file(file_id))
    }

    pub fn file(&self, session_id: &str, file_id: &str) -> Result<UploadedFile> {
        let session = self
            .session(session_id)
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;

        session
            .file(file_id)
            .cloned()
            .ok_or_else(|| SessionError::FileNotFound(file_id.to_string()))
    }

    /// Materialize a file payload under `dir`
    pub async fn export_file(&self, session_id: &str, file_id: &str, dir: &Path) -> Result<PathBuf> {
        let file = self.file(session_id, file_id)?;
        intake::export_file(&file, dir).await
    }

    /// Dispatch to the active session
    pub async fn dispatch(&self, submission: Submission, panel: Panel) -> DispatchOutcome {
        match self.active_id() {
            Some(id) => self.dispatch_to(&id, submission, panel).await,
            None => DispatchOutcome::NoActiveSession,
        }
    }

    /// Commit the user message, call the backend, then commit the reply
    ///
    /// The reply goes to the session and panel captured here, even if the
    /// user has moved on by the time it arrives.
    pub async fn dispatch_to(&self, session_id: &str, submission: Submission, panel: Panel) -> DispatchOutcome {
        let text = submission.text().to_string();

        let _busy = {
            let mut state = self.lock();
            let config = state.store.config().clone();
            let message = Message::user(state.store.next_id(), panel, text.clone());

            let committed = state.store.update(session_id, |session| {
                let mut session = session.append_to(panel, message);
                if session.has_default_title(&config.default_title) {
                    session.title = derive_title(&text, config.title_max_chars, &config.title_ellipsis);
                }
                session
            });
            if committed.is_none() {
                return DispatchOutcome::SessionNotFound;
            }

            *state.in_flight.entry(session_id.to_string()).or_insert(0) += 1;
            BusyGuard {
                inner: Arc::clone(&self.inner),
                session_id: session_id.to_string(),
            }
        };

        tracing::debug!(session_id = %session_id, panel = %panel, "Dispatching");

        let content = match request_reply(self.backend.as_ref(), panel, &text).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(
                    session_id = %session_id,
                    panel = %panel,
                    error = %e,
                    "Dispatch failed"
                );
                return DispatchOutcome::Failed { reason: e.to_string() };
            }
        };

        let mut state = self.lock();
        if state.store.active_id() != Some(session_id) {
            tracing::warn!(session_id = %session_id, "Reply committed to a session that is no longer active");
        }

        let reply = Message::assistant(state.store.next_id(), panel, content);
        let committed = state
            .store
            .update(session_id, |session| session.append_to(panel, reply.clone()))
            .is_some();
        drop(state);

        if committed {
            DispatchOutcome::Replied { message: reply }
        } else {
            tracing::warn!(session_id = %session_id, "Session deleted before reply arrived; reply dropped");
            DispatchOutcome::SessionGone
        }
    }

    /// Whether any dispatch for the session is still pending
    pub fn is_busy(&self, session_id: &str) -> bool {
        self.lock().in_flight.get(session_id).copied().unwrap_or(0) > 0
    }

    /// Document list for a result card
    pub async fn grant_documents(&self, grant_id: &str) -> std::result::Result<GrantDocuments, BackendError> {
        self.backend.grant_documents(grant_id).await
    }
}

/// Releases one in-flight slot when dropped
struct BusyGuard {
    inner: Arc<Mutex<EngineState>>,
    session_id: String,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let mut state = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(count) = state.in_flight.get_mut(&self.session_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                state.in_flight.remove(&self.session_id);
            }
        }
    }
}
