//! HTTP API server for the guestbook.
//!
//! This crate provides:
//! - Submission create/list/get endpoints behind an API key
//! - Photo upload and public photo serving
//! - The two-step submission delete (photo first, then record)
//! - Operator tooling for records whose photo went missing

pub mod auth;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod metrics;
pub mod routes;
pub mod saga;
pub mod service;
pub mod state;

pub use auth::TraceId;
pub use error::ApiError;
pub use routes::create_router;
pub use saga::{DeleteError, DeleteReport, DeleteSaga, FileStep};
pub use service::{ServiceError, SubmissionService};
pub use state::AppState;
