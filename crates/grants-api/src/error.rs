use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use grants_client::BackendError;
use grants_session::SessionError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("No active session")]
    NoActiveSession,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::SessionNotFound(id) => ApiError::SessionNotFound(id),
            SessionError::FileNotFound(id) => ApiError::FileNotFound(id),
            SessionError::NoActiveSession => ApiError::NoActiveSession,
            SessionError::EmptyUpload => ApiError::BadRequest(err.to_string()),
            SessionError::Io(_) | SessionError::Configuration(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::SessionNotFound(_) | ApiError::FileNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::NoActiveSession => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Backend(BackendError::InvalidRequest(ref msg)) => {
                (StatusCode::BAD_REQUEST, format!("Invalid request: {}", msg))
            }
            ApiError::Backend(ref e) => {
                tracing::error!("Backend error: {}", e);
                (StatusCode::BAD_GATEWAY, "Backend unavailable".to_string())
            }
            ApiError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
