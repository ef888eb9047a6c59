//! API error types.

use crate::messages::{self, MessageStatus};
use crate::saga::DeleteError;
use crate::service::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use guestbook_records::RecordError;
use guestbook_storage::StorageError;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Message for display to the user.
    #[serde(rename = "messageStatus")]
    pub message_status: MessageStatus,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("forbidden: invalid API key")]
    Forbidden,

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Delete(#[from] DeleteError),
}

impl From<guestbook_core::Error> for ApiError {
    fn from(e: guestbook_core::Error) -> Self {
        Self::Service(e.into())
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        Self::Service(e.into())
    }
}

impl From<RecordError> for ApiError {
    fn from(e: RecordError) -> Self {
        Self::Service(e.into())
    }
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Forbidden => "forbidden",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Service(e) => match e {
                ServiceError::Validation(_) => "validation_error",
                ServiceError::NotFound(_) | ServiceError::PhotoNotFound(_) => "not_found",
                ServiceError::Io(_) => "io_error",
                ServiceError::Storage(_) => "storage_error",
            },
            Self::Delete(e) => e.code(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Service(e) => match e {
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) | ServiceError::PhotoNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::Io(_) | ServiceError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Delete(e) => match e {
                DeleteError::NotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the bilingual message shown to the user.
    pub fn message_status(&self) -> MessageStatus {
        match self {
            Self::BadRequest(_) => messages::BAD_REQUEST,
            Self::Forbidden => messages::FORBIDDEN,
            Self::PayloadTooLarge(_) => messages::UPLOAD_TOO_LARGE,
            Self::Service(e) => match e {
                ServiceError::Validation(
                    guestbook_core::Error::EmptyUpload | guestbook_core::Error::MissingField("image"),
                ) => messages::UPLOAD_MISSING,
                ServiceError::Validation(_) => messages::INVALID_INPUT,
                ServiceError::PhotoNotFound(_) => messages::PHOTO_NOT_FOUND,
                ServiceError::NotFound(_) => messages::NOT_FOUND,
                ServiceError::Io(_) => messages::PHOTO_FAILED,
                ServiceError::Storage(_) => messages::SAVE_FAILED,
            },
            Self::Delete(e) => match e {
                DeleteError::NotFound { .. } => messages::NOT_FOUND,
                DeleteError::LookupFailed { .. } => messages::LOOKUP_FAILED,
                DeleteError::FileDeleteFailed { .. } => messages::FILE_DELETE_FAILED,
                DeleteError::RecordDeleteFailed { .. } if e.is_partial() => {
                    messages::PARTIAL_DELETE
                }
                DeleteError::RecordDeleteFailed { .. } => messages::RECORD_DELETE_FAILED,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            success: false,
            code: self.code().to_string(),
            message: self.to_string(),
            message_status: self.message_status(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
