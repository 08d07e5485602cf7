use axum::{
    extract::{Path, State},
    Json,
};
use grants_types::GrantDocuments;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

/// Documents attached to a grant call, straight from the backend
pub async fn grant_documents(
    State(state): State<Arc<AppState>>,
    Path(grant_id): Path<String>,
) -> ApiResult<Json<GrantDocuments>> {
    Ok(Json(state.engine.grant_documents(&grant_id).await?))
}
