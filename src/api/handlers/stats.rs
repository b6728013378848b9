//! Handler for aggregate statistics.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns aggregate link counts.
///
/// # Endpoint
///
/// `GET /api/v1/stats`
///
/// # Response
///
/// ```json
/// {
///   "total_links": 120,
///   "total_accesses": 5400,
///   "active_links": 110,
///   "expired_links": 10,
///   "permanent_links": 0
/// }
/// ```
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.link_service.stats().await?;
    Ok(Json(stats.into()))
}
