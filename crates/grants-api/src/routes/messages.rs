use axum::{
    extract::{Path, Query, State},
    Json,
};
use grants_session::{DispatchOutcome, Submission};
use grants_types::{Message, Panel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub panel: Option<Panel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub panel: Panel,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
    /// Defaults to the session's active panel
    pub panel: Option<Panel>,
}

/// Read one panel thread, the active panel's by default
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> ApiResult<Json<ListMessagesResponse>> {
    let session = state
        .engine
        .session(&session_id)
        .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))?;

    let panel = query.panel.unwrap_or(session.active_panel);
    Ok(Json(ListMessagesResponse {
        panel,
        messages: session.messages(panel).to_vec(),
    }))
}

/// Dispatch a message and wait until it settles
///
/// The dispatch runs on its own task so a dropped connection does not
/// cancel the backend call; the reply is committed either way.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<DispatchOutcome>> {
    let submission =
        Submission::new(&req.text).ok_or_else(|| ApiError::BadRequest("message text is blank".to_string()))?;

    let panel = match req.panel {
        Some(panel) => panel,
        None => {
            state
                .engine
                .session(&session_id)
                .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))?
                .active_panel
        }
    };

    let engine = state.engine.clone();
    let id = session_id.clone();
    let outcome = tokio::spawn(async move { engine.dispatch_to(&id, submission, panel).await })
        .await
        .map_err(|e| ApiError::Internal(format!("dispatch task failed: {}", e)))?;

    match outcome {
        DispatchOutcome::SessionNotFound => Err(ApiError::SessionNotFound(session_id)),
        outcome => Ok(Json(outcome)),
    }
}
