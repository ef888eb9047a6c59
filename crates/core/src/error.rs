//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("file does not exist in storage: {0}")]
    UnknownFile(String),

    #[error("file already belongs to another submission: {0}")]
    FilenameTaken(String),

    #[error("uploaded file is empty")]
    EmptyUpload,
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
