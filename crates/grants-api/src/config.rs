use config::{Config as ConfigLoader, ConfigError, Environment, File};
use grants_client::BackendConfig;
use grants_session::EngineConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            timeout_secs: default_request_timeout(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

fn default_request_timeout() -> u64 {
    120
}

fn default_max_upload_mb() -> usize {
    25
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    #[default]
    Http,
    Mock,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Http => "http",
            BackendMode::Mock => "mock",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    #[serde(default)]
    pub mode: BackendMode,
    pub base_url: String,
    #[serde(default = "default_search_path")]
    pub search_path: String,
    #[serde(default = "default_document_path")]
    pub document_path: String,
    #[serde(default = "default_documents_path")]
    pub documents_path: String,
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        let defaults = BackendConfig::default();
        Self {
            mode: BackendMode::default(),
            base_url: defaults.base_url,
            search_path: defaults.search_path,
            document_path: defaults.document_path,
            documents_path: defaults.documents_path,
            timeout_secs: defaults.timeout.as_secs(),
        }
    }
}

fn default_search_path() -> String {
    BackendConfig::default().search_path
}

fn default_document_path() -> String {
    BackendConfig::default().document_path
}

fn default_documents_path() -> String {
    BackendConfig::default().documents_path
}

fn default_backend_timeout() -> u64 {
    BackendConfig::default().timeout.as_secs()
}

impl From<&BackendSettings> for BackendConfig {
    fn from(settings: &BackendSettings) -> Self {
        BackendConfig::new(settings.base_url.clone())
            .with_search_path(settings.search_path.clone())
            .with_document_path(settings.document_path.clone())
            .with_documents_path(settings.documents_path.clone())
            .with_timeout(Duration::from_secs(settings.timeout_secs))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_announce_uploads")]
    pub announce_uploads: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            announce_uploads: default_announce_uploads(),
        }
    }
}

fn default_announce_uploads() -> bool {
    true
}

impl From<&EngineSettings> for EngineConfig {
    fn from(settings: &EngineSettings) -> Self {
        EngineConfig::default().with_announce_uploads(settings.announce_uploads)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (with SERVER_, BACKEND_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .prefix("SERVER")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("BACKEND")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("LOG")
                    .separator("_")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Explicit overrides for the keys set per deployment
        if let Ok(url) = std::env::var("BACKEND_URL") {
            cfg.backend.base_url = url;
        }
        if let Ok(mode) = std::env::var("BACKEND_MODE") {
            cfg.backend.mode = match mode.to_lowercase().as_str() {
                "mock" => BackendMode::Mock,
                "http" => BackendMode::Http,
                other => {
                    return Err(ConfigError::Message(format!("unknown backend mode: {}", other)));
                }
            };
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            cfg.logging.level = level;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            cfg.server.port = port
                .parse()
                .map_err(|_| ConfigError::Message(format!("invalid SERVER_PORT: {}", port)))?;
        }

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [cors]
            enabled = true
            origins = ["http://localhost:5173"]

            [backend]
            mode = "mock"
            base_url = "http://relay:4000"
            search_path = "/grant-search"
            timeout_secs = 5

            [engine]
            announce_uploads = false

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_mb, 25);
        assert_eq!(config.backend.mode, BackendMode::Mock);
        assert!(!config.engine.announce_uploads);

        let backend = BackendConfig::from(&config.backend);
        assert_eq!(backend.search_url(), "http://relay:4000/grant-search");
        assert_eq!(backend.document_url(), "http://relay:4000/preguntar_rag");
        assert_eq!(backend.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend.mode, BackendMode::Http);
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_shipped_default_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
        let config = Config::from_file(path).unwrap();
        assert_eq!(config.backend.search_path, "/convocatorias");
        assert_eq!(config.server.port, 8080);
    }
}
