//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect
//! - `GET  /health`   - Health check: store, cache, filter, access queue
//! - `/api/v1/*`      - REST API (rate limited)
//! - `/api/v1/admin/*` - Admin API (bearer token when `ADMIN_TOKEN` is set)
//!
//! # Middleware
//!
//! - **CORS** - Any origin; preflight answers 204
//! - **Tracing** - Structured request/response logging
//! - **Deadline** - Per-request timeout
//! - **Rate limiting** - Per-IP token bucket on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, cors, deadline, rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use anyhow::Result;
use axum::routing::get;
use axum::{Router, middleware};
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Errors
///
/// Returns an error if the rate limit settings are invalid.
pub fn app_router(state: AppState, config: &Config) -> Result<NormalizePath<Router>> {
    let admin_router = api::routes::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::layer,
    ));

    let api_router = api::routes::public_routes()
        .merge(admin_router)
        .layer(rate_limit::layer(
            config.rate_limit_per_second,
            config.rate_limit_burst,
        )?);

    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            Duration::from_secs(config.request_timeout_seconds),
            deadline::layer,
        ))
        .layer(tracing::layer())
        .layer(cors::layer())
        .layer(middleware::from_fn(cors::preflight_status));

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
