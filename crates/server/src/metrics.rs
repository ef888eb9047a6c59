//! Prometheus metrics for the guestbook server.
//!
//! The `/metrics` endpoint is unauthenticated so Prometheus can scrape it.
//! Disable it with `server.metrics_enabled = false` when the server is
//! reachable from untrusted networks.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static SUBMISSIONS_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "guestbook_submissions_created_total",
        "Total number of submissions created",
    )
    .expect("metric creation failed")
});

pub static UPLOADS_STORED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "guestbook_uploads_stored_total",
        "Total number of photos stored",
    )
    .expect("metric creation failed")
});

pub static UPLOAD_BYTES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "guestbook_upload_bytes_total",
        "Total bytes of photos stored",
    )
    .expect("metric creation failed")
});

/// Delete outcomes: `done` or a delete error code.
pub static SAGA_OUTCOMES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "guestbook_delete_outcomes_total",
            "Submission deletes by outcome",
        ),
        &["outcome"],
    )
    .expect("metric creation failed")
});

pub static SAGA_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "guestbook_delete_duration_seconds",
            "Time taken to delete a submission and its photo",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 10.0]),
    )
    .expect("metric creation failed")
});

pub static ORPHANS_REMOVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "guestbook_orphaned_records_removed_total",
        "Records removed because their photo was missing",
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(SUBMISSIONS_CREATED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(UPLOADS_STORED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(UPLOAD_BYTES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(SAGA_OUTCOMES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(SAGA_DURATION.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(ORPHANS_REMOVED.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}
