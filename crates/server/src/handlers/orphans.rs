//! Operator endpoints for records whose photo has gone missing.

use super::common::respond;
use crate::error::ApiResult;
use crate::messages;
use crate::service::ReconcileReport;
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use guestbook_core::Submission;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct OrphanListBody {
    pub data: Vec<Submission>,
}

#[derive(Debug, Serialize)]
pub struct ReconcileBody {
    pub data: ReconcileReport,
}

/// GET /api/orphans - List submissions whose photo is missing.
pub async fn list_orphans(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let orphans = state.service().find_orphans().await?;
    Ok(respond(messages::LOADED, OrphanListBody { data: orphans }))
}

/// POST /api/orphans/reconcile - Remove submissions whose photo is missing.
pub async fn reconcile_orphans(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let report = state.service().reconcile_orphans().await?;
    Ok(respond(messages::ORPHANS_REMOVED, ReconcileBody { data: report }))
}
