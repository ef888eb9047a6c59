//! Record store error types.

use thiserror::Error;

/// Record store operation errors.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("filename already belongs to a submission: {0}")]
    FilenameTaken(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for record store operations.
pub type RecordResult<T> = std::result::Result<T, RecordError>;
