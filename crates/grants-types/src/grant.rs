use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Publication status of a grant call
///
/// Values the relay adds later are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GrantStatus {
    Open,
    Closed,
    ClosedNonPublic,
    Other(String),
}

impl GrantStatus {
    pub fn label(&self) -> &str {
        match self {
            GrantStatus::Open => "Abierta",
            GrantStatus::Closed => "Cerrada",
            GrantStatus::ClosedNonPublic => "Cerrada (No pública)",
            GrantStatus::Other(raw) => raw,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, GrantStatus::Open)
    }

    /// Value written back on the wire
    pub fn as_wire(&self) -> &str {
        match self {
            GrantStatus::Open => "abierta",
            GrantStatus::Closed => "cerrada",
            GrantStatus::ClosedNonPublic => "cerrada-no-publica",
            GrantStatus::Other(raw) => raw,
        }
    }
}

impl Default for GrantStatus {
    fn default() -> Self {
        GrantStatus::Other(String::new())
    }
}

impl From<String> for GrantStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "abierta" | "open" => GrantStatus::Open,
            "cerrada" | "closed" => GrantStatus::Closed,
            "cerrada-no-publica" | "closed-non-public" => GrantStatus::ClosedNonPublic,
            _ => GrantStatus::Other(raw),
        }
    }
}

impl From<GrantStatus> for String {
    fn from(status: GrantStatus) -> Self {
        match status {
            GrantStatus::Other(raw) => raw,
            known => known.as_wire().to_string(),
        }
    }
}

/// One grant call returned by the search backend
///
/// Field names follow the relay's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "numeroConvocatoria", default, deserialize_with = "string_or_number")]
    pub convocation_number: String,

    #[serde(rename = "descripcion", default)]
    pub description: String,

    #[serde(rename = "fechaRecepcion", default)]
    pub received_on: String,

    /// Top-level administration (ministry, region, ...)
    #[serde(rename = "nivel1", default)]
    pub level1: String,

    /// Granting body inside `level1`
    #[serde(rename = "nivel2", default)]
    pub level2: String,

    #[serde(
        rename = "presupuesto_total",
        default,
        deserialize_with = "optional_string_or_number"
    )]
    pub total_budget: Option<String>,

    #[serde(rename = "inicio", default)]
    pub application_start: String,

    #[serde(rename = "final", default)]
    pub application_end: String,

    /// URL of the regulatory bases document
    #[serde(rename = "bases", default)]
    pub bases_url: String,

    #[serde(rename = "estado", default, deserialize_with = "status_from_wire")]
    pub status: GrantStatus,
}

impl SearchResult {
    pub fn has_pdf_bases(&self) -> bool {
        self.bases_url.to_lowercase().contains(".pdf")
    }

    /// Suggested local file name when downloading the bases PDF
    pub fn bases_file_name(&self) -> String {
        format!("convocatoria_{}.pdf", self.convocation_number)
    }
}

/// Documents attached to a grant call, as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantDocuments {
    #[serde(default)]
    pub documents: Vec<GrantDocument>,

    /// Path of a zip bundling every document, when the backend offers one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantDocument {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub download: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn status_from_wire<'de, D>(deserializer: D) -> Result<GrantStatus, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_number(deserializer).map(GrantStatus::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
