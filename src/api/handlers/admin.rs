//! Handlers for admin endpoints.

use axum::{Json, extract::State};
use chrono::Utc;

use crate::api::dto::admin::{CleanupResponse, FilterInfoResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Deletes every link whose expiry is in the past.
///
/// # Endpoint
///
/// `POST /api/v1/admin/clean`
///
/// # Response
///
/// ```json
/// { "deleted_count": 3, "timestamp": "2026-01-01T12:00:00Z" }
/// ```
pub async fn cleanup_handler(
    State(state): State<AppState>,
) -> Result<Json<CleanupResponse>, AppError> {
    let deleted_count = state.link_service.clean_expired().await?;

    Ok(Json(CleanupResponse {
        deleted_count,
        timestamp: Utc::now(),
    }))
}

/// Returns membership filter diagnostics.
///
/// `GET /api/v1/admin/filter`
pub async fn filter_info_handler(
    State(state): State<AppState>,
) -> Result<Json<FilterInfoResponse>, AppError> {
    let filter = state.link_service.filter_info().await?;
    Ok(Json(FilterInfoResponse { filter }))
}
