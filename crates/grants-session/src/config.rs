use serde::{Deserialize, Serialize};

use grants_types::DEFAULT_TITLE;

pub const SEARCH_WELCOME: &str = "¡Bienvenido al Asistente de Subvenciones! Puedo ayudarte a buscar ayudas \
públicas. Describe qué tipo de ayuda necesitas y te mostraré las convocatorias relacionadas.";

pub const DOCUMENT_WELCOME: &str = "Sube los documentos de una convocatoria y hazme preguntas específicas \
sobre elegibilidad, requisitos, plazos o cualquier otro detalle.";

/// Tunables of the chat engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Placeholder title replaced by the first user message
    pub default_title: String,
    /// System message seeded into every new search thread
    pub search_welcome: String,
    /// System message seeded into every new document thread
    pub document_welcome: String,
    pub title_max_chars: usize,
    pub title_ellipsis: String,
    /// Post a system message into the document thread after each upload
    pub announce_uploads: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            search_welcome: SEARCH_WELCOME.to_string(),
            document_welcome: DOCUMENT_WELCOME.to_string(),
            title_max_chars: 30,
            title_ellipsis: "...".to_string(),
            announce_uploads: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_welcome(mut self, search: impl Into<String>, document: impl Into<String>) -> Self {
        self.search_welcome = search.into();
        self.document_welcome = document.into();
        self
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    pub fn with_title_max_chars(mut self, max_chars: usize) -> Self {
        self.title_max_chars = max_chars;
        self
    }

    pub fn with_announce_uploads(mut self, announce: bool) -> Self {
        self.announce_uploads = announce;
        self
    }
}
