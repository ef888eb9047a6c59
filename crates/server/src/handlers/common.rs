//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use crate::messages::MessageStatus;
use axum::Json;
use axum::extract::Request;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Largest JSON body accepted by the JSON endpoints.
pub const MAX_JSON_BODY_SIZE: usize = 64 * 1024;

/// Success envelope: `success`, `messageStatus`, plus the endpoint's fields.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(rename = "messageStatus")]
    pub message_status: MessageStatus,
    #[serde(flatten)]
    pub body: T,
}

/// Wrap `body` in a success envelope.
pub fn respond<T: Serialize>(message_status: MessageStatus, body: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message_status,
        body,
    })
}

/// Read and parse a JSON request body.
pub async fn read_json<T: DeserializeOwned>(req: Request) -> ApiResult<T> {
    let bytes = axum::body::to_bytes(req.into_body(), MAX_JSON_BODY_SIZE)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}
