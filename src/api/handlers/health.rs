//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1`
/// 2. **Cache**: Redis PING (always ok when caching is disabled)
/// 3. **Filter**: membership filter diagnostics
/// 4. **Access queue**: channel open, remaining capacity
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let report = state.link_service.health().await;
    let healthy = report.is_healthy();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: CheckStatus::from_flag(report.store, "Connected", "Database unreachable"),
            cache: CheckStatus::from_flag(report.cache, "Connected", "Cache unreachable"),
            filter: CheckStatus::from_flag(report.filter, "Available", "Filter unavailable"),
            access_queue: CheckStatus::from_flag(
                report.queue_open,
                format!(
                    "Available: {}/{}",
                    report.queue_available, report.queue_capacity
                ),
                "Access queue is closed",
            ),
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
