pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::logging;
use crate::routes::{files, grants, health, messages, sessions};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.server.max_upload_mb * 1024 * 1024;

    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Sessions
        .route("/sessions", get(sessions::list_sessions).post(sessions::create_session))
        .route("/sessions/bootstrap", post(sessions::bootstrap))
        .route("/sessions/import", post(sessions::import_session))
        .route(
            "/sessions/:session_id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/sessions/:session_id/select", post(sessions::select_session))
        .route("/sessions/:session_id/panel", put(sessions::set_panel))
        .route("/sessions/:session_id/grants/select", post(sessions::select_grant))
        // Messages
        .route(
            "/sessions/:session_id/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        // Files
        .route(
            "/sessions/:session_id/files",
            post(files::upload_files).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/sessions/:session_id/files/:file_id",
            get(files::download_file).delete(files::delete_file),
        )
        // Grants
        .route("/grants/:grant_id/documents", get(grants::grant_documents));

    api_routes
        .layer(axum_middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(Duration::from_secs(state.config.server.timeout_secs)))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}
