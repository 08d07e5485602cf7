use grants_client::GrantBackend;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::ChatEngine;
use crate::error::{Result, SessionError};

pub struct ChatEngineBuilder {
    backend: Option<Arc<dyn GrantBackend>>,
    config: EngineConfig,
}

impl ChatEngineBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            config: EngineConfig::default(),
        }
    }

    pub fn backend(mut self, backend: Arc<dyn GrantBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn announce_uploads(mut self, announce: bool) -> Self {
        self.config.announce_uploads = announce;
        self
    }

    pub fn build(self) -> Result<ChatEngine> {
        let backend = self
            .backend
            .ok_or_else(|| SessionError::Configuration("backend is required".to_string()))?;

        if self.config.title_max_chars == 0 {
            return Err(SessionError::Configuration(
                "title_max_chars must be greater than zero".to_string(),
            ));
        }

        Ok(ChatEngine::new(backend, self.config))
    }
}

impl Default for ChatEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
