use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use grants_types::{format_file_size, FileHandle, UploadedFile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub files: Vec<FileView>,
}

/// File metadata as shown on a file card
#[derive(Debug, Serialize, Deserialize)]
pub struct FileView {
    #[serde(flatten)]
    pub file: UploadedFile,
    pub size_label: String,
}

impl From<UploadedFile> for FileView {
    fn from(file: UploadedFile) -> Self {
        Self {
            size_label: format_file_size(file.size),
            file,
        }
    }
}

/// Multipart file intake; every part carrying a file name is a file
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let mut handles = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_MIME.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read {}: {}", name, e)))?;

        handles.push(FileHandle::new(name, mime_type, bytes.to_vec()));
    }

    let records = state.engine.upload_files_to(&session_id, handles)?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            files: records.into_iter().map(FileView::from).collect(),
        }),
    ))
}

/// Download the stored payload of a file
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path((session_id, file_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let file = state.engine.file(&session_id, &file_id)?;

    let mime_type = if file.mime_type.is_empty() {
        FALLBACK_MIME.to_string()
    } else {
        file.mime_type.clone()
    };
    let disposition = format!("attachment; filename=\"{}\"", file.name.replace(['"', '\\'], ""));

    Ok((
        [
            (header::CONTENT_TYPE, mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.payload().to_vec(),
    )
        .into_response())
}

pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path((session_id, file_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state.engine.remove_file_from(&session_id, &file_id)?;
    Ok(StatusCode::NO_CONTENT)
}
