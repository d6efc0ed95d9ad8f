use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool reads, reconciles, or writes meet documents.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the JSON report cannot be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when XML text cannot be tokenised or emitted.
    #[error("XML error: {0}")]
    Xml(String),

    /// Errors bubbled up while opening a compressed Lenex container.
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Raised when a document does not carry the structure the readers expect.
    #[error("invalid {kind} document: {message}")]
    InvalidDocument { kind: &'static str, message: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a Lenex container holds nothing that can be read.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    pub(crate) fn lenex(message: impl Into<String>) -> Self {
        ToolError::InvalidDocument {
            kind: "Lenex",
            message: message.into(),
        }
    }

    pub(crate) fn dian(message: impl Into<String>) -> Self {
        ToolError::InvalidDocument {
            kind: "Dian",
            message: message.into(),
        }
    }
}
