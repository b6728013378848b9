//! API route configuration.

use crate::api::handlers::{
    cleanup_handler, filter_info_handler, info_handler, shorten_handler, stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public API routes.
///
/// # Endpoints
///
/// - `POST /v1/shorten`      - Create a short link
/// - `GET  /v1/info/{code}`  - Link metadata
/// - `GET  /v1/stats`        - Aggregate counts
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/shorten", post(shorten_handler))
        .route("/v1/info/{code}", get(info_handler))
        .route("/v1/stats", get(stats_handler))
}

/// Admin routes, protected by [`crate::api::middleware::auth`].
///
/// # Endpoints
///
/// - `POST /v1/admin/clean`   - Delete expired links
/// - `GET  /v1/admin/filter`  - Membership filter diagnostics
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/clean", post(cleanup_handler))
        .route("/v1/admin/filter", get(filter_info_handler))
}
