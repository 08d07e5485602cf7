use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("No active session")]
    NoActiveSession,

    #[error("No files to upload")]
    EmptyUpload,

    #[error("File export failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
