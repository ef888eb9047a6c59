//! Submission endpoints.

use super::common::{read_json, respond};
use crate::error::{ApiError, ApiResult};
use crate::messages;
use crate::saga::DeleteReport;
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::response::IntoResponse;
use guestbook_core::Submission;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/createData`.
///
/// Absent fields deserialize as empty and are rejected by validation.
#[derive(Debug, Deserialize)]
pub struct CreateDataRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Body of `DELETE /api/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteDataRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct SubmissionBody {
    pub data: Submission,
}

#[derive(Debug, Serialize)]
pub struct SubmissionListBody {
    pub data: Vec<Submission>,
}

#[derive(Debug, Serialize)]
pub struct DeleteBody {
    pub data: DeleteReport,
}

/// POST /api/createData - Create a submission.
pub async fn create_data(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let body: CreateDataRequest = read_json(req).await?;

    let submission = state
        .service()
        .create(&body.name, &body.message, body.filename)
        .await?;

    Ok(respond(messages::CREATED, SubmissionBody { data: submission }))
}

/// GET /api/getAllData - List submissions, newest first.
pub async fn get_all_data(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let submissions = state.service().list().await?;
    Ok(respond(
        messages::LOADED,
        SubmissionListBody { data: submissions },
    ))
}

/// GET /api/getData/{id} - Fetch one submission.
pub async fn get_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let submission = state.service().get_by_id(&id).await?;
    Ok(respond(messages::LOADED, SubmissionBody { data: submission }))
}

/// DELETE /api/delete - Delete a submission and its photo.
pub async fn delete_data(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let body: DeleteDataRequest = read_json(req).await?;

    let id = body.id.trim();
    if id.is_empty() {
        return Err(ApiError::BadRequest("id is required".to_string()));
    }

    let report = state.delete_saga().run(id).await?;
    Ok(respond(messages::DELETED, DeleteBody { data: report }))
}
