//! Route configuration.

use crate::auth::{API_KEY_HEADER, require_api_key, trace_middleware};
use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware;
use axum::routing::{delete, get, post};
use guestbook_core::config::ServerConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.server.max_upload_bytes);

    // Every /api route requires the API key; rejected requests never reach a handler.
    let api_routes = Router::new()
        .route("/api/createData", post(handlers::create_data))
        .route(
            "/api/upload",
            post(handlers::upload_image).layer(upload_limit),
        )
        .route("/api/getAllData", get(handlers::get_all_data))
        .route("/api/getData/{id}", get(handlers::get_data))
        .route("/api/delete", delete(handlers::delete_data))
        .route("/api/orphans", get(handlers::list_orphans))
        .route(
            "/api/orphans/reconcile",
            post(handlers::reconcile_orphans),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    // Photos are embedded by <img> tags, which cannot send the API key.
    let public_routes = Router::new()
        .route("/uploads/{filename}", get(handlers::serve_upload))
        .route("/health", get(handlers::health_check));

    let mut router = Router::new().merge(api_routes).merge(public_routes);

    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    let cors = cors_layer(&state.config.server);

    // Layers run outermost first: CORS -> TraceLayer -> trace span -> routes.
    router
        .layer(middleware::from_fn(trace_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS policy: any origin unless `server.cors_allowed_origins` lists some.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)]);

    if config.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
