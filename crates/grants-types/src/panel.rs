use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two independent conversation modes of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    /// Grant search against the lookup backend
    #[default]
    Search,
    /// Questions about uploaded documents (RAG)
    Document,
}

impl Panel {
    pub const ALL: [Panel; 2] = [Panel::Search, Panel::Document];

    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::Search => "search",
            Panel::Document => "document",
        }
    }

    /// Sidebar caption shown under a session title
    pub fn caption(&self) -> &'static str {
        match self {
            Panel::Search => "Búsqueda de Ayudas",
            Panel::Document => "Consulta de Documentos",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(Panel::Search),
            "document" => Ok(Panel::Document),
            other => Err(format!("unknown panel: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
