//! Request-scoped deadline middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use std::time::Duration;
use tracing::warn;

use crate::error::AppError;

/// Drops the handler future once `timeout` elapses.
///
/// Dropping the future cancels any in-flight store or cache call.
/// Timed-out requests answer `500` with an `internal_error` body.
///
/// # Example
///
/// ```rust,ignore
/// let app = router.layer(middleware::from_fn_with_state(
///     Duration::from_secs(30),
///     deadline::layer,
/// ));
/// ```
pub async fn layer(
    State(timeout): State<Duration>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    match tokio::time::timeout(timeout, next.run(req)).await {
        Ok(response) => Ok(response),
        Err(_) => {
            warn!(path = %path, "Request exceeded deadline of {:?}", timeout);
            Err(AppError::internal(
                "Request timed out",
                json!({ "timeout_ms": timeout.as_millis() as u64 }),
            ))
        }
    }
}
