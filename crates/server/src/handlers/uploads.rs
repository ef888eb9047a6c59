//! Photo upload and retrieval endpoints.

use super::common::respond;
use crate::error::{ApiError, ApiResult};
use crate::messages;
use crate::state::AppState;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use axum::response::IntoResponse;
use guestbook_core::filename::extension_of;
use serde::Serialize;

/// Multipart field carrying the photo.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct UploadBody {
    pub filename: String,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(format!("invalid multipart body: {}", e.body_text()))
    }
}

/// POST /api/upload - Store the photo in the `image` field.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let mut multipart =
        multipart.map_err(|e| ApiError::BadRequest(format!("expected multipart body: {e}")))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        let filename = state.service().upload(data, &original_name).await?;
        return Ok(respond(messages::UPLOADED, UploadBody { filename }));
    }

    Err(guestbook_core::Error::MissingField(IMAGE_FIELD).into())
}

/// Content type for a stored photo, from its extension.
fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename)
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// GET /uploads/{filename} - Serve a stored photo.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let data = state.service().read_photo(&filename).await?;

    Ok((
        [
            (CONTENT_TYPE, content_type_for(&filename)),
            (X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        data,
    ))
}
