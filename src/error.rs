use std::path::PathBuf;

use thiserror::Error;

/// Main application error type that encompasses all possible failure modes
///
/// Diagnostics about the documents themselves (empty input, malformed markup,
/// undeclared elements) are never errors of this type: they are reported as
/// data inside a [`crate::ValidationOutcome`]. This type covers failures of
/// the machinery around them.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document parser failure: {details}")]
    Parser { details: String },

    #[error("Resource exhaustion: {resource} - {details}")]
    ResourceExhaustion { resource: String, details: String },

    #[error("Schema not found: {path}")]
    SchemaNotFound { path: PathBuf },

    #[error("Schema location not found: {file} - no schema hint present")]
    SchemaUrlNotFound { file: PathBuf },

    #[error("Remote schema not supported: {url}")]
    RemoteSchema { url: String },

    #[error("File system traversal error: {path} - {reason}")]
    FileSystemTraversal { path: PathBuf, reason: String },

    #[error("Concurrent operation error: {details}")]
    Concurrency { details: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<crate::config::ConfigError> for ValidationError {
    fn from(err: crate::config::ConfigError) -> Self {
        ValidationError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ValidationError>;
