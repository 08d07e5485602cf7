use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use grants_types::{Panel, SearchResult, Session, SessionRecord, SessionSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionSummary>,
    pub active_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportSessionResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPanelRequest {
    pub panel: Panel,
}

/// List sessions, newest first
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> ApiResult<Json<ListSessionsResponse>> {
    Ok(Json(ListSessionsResponse {
        sessions: state.engine.sessions(),
        active_id: state.engine.active_id(),
    }))
}

pub async fn create_session(State(state): State<Arc<AppState>>) -> ApiResult<(StatusCode, Json<Session>)> {
    Ok((StatusCode::CREATED, Json(state.engine.create_session())))
}

/// Active session, creating one on first entry
pub async fn bootstrap(State(state): State<Arc<AppState>>) -> ApiResult<Json<Session>> {
    Ok(Json(state.engine.ensure_session()))
}

/// Accept a session in either the current or the older single-thread shape
pub async fn import_session(
    State(state): State<Arc<AppState>>,
    Json(record): Json<SessionRecord>,
) -> ApiResult<(StatusCode, Json<ImportSessionResponse>)> {
    let id = state.engine.import_session(record);
    Ok((StatusCode::CREATED, Json(ImportSessionResponse { id })))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<Session>> {
    state
        .engine
        .session(&session_id)
        .map(Json)
        .ok_or(ApiError::SessionNotFound(session_id))
}

/// Make a session active; a miss clears the active session
pub async fn select_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<Session>> {
    state
        .engine
        .select_session(&session_id)
        .map(Json)
        .ok_or(ApiError::SessionNotFound(session_id))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.engine.delete_session(&session_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_panel(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SetPanelRequest>,
) -> ApiResult<Json<Session>> {
    Ok(Json(state.engine.set_panel(&session_id, req.panel)?))
}

/// Pick a search result for detailed questions
pub async fn select_grant(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(grant): Json<SearchResult>,
) -> ApiResult<Json<Session>> {
    Ok(Json(state.engine.select_grant_in(&session_id, &grant)?))
}
