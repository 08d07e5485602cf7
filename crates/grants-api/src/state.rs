use grants_client::{BackendConfig, GrantBackend, HttpBackend, MockBackend};
use grants_session::ChatEngine;
use std::sync::Arc;

use crate::config::{BackendMode, Config};

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: ChatEngine,
}

impl AppState {
    pub fn new(config: Config, engine: ChatEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine,
        }
    }
}

/// Backend selected by `[backend] mode`
pub fn build_backend(config: &Config) -> grants_client::Result<Arc<dyn GrantBackend>> {
    match config.backend.mode {
        BackendMode::Http => {
            let backend = HttpBackend::new(BackendConfig::from(&config.backend))?;
            Ok(Arc::new(backend))
        }
        BackendMode::Mock => Ok(Arc::new(MockBackend::new())),
    }
}
