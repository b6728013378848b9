//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/v1/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/very/long/path",
///   "custom_code": "promo",               // optional
///   "expires_at": "2026-12-31T00:00:00Z"  // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_url": "http://localhost:8080/aB3xY9",
///   "short_code": "aB3xY9",
///   "original_url": "https://example.com/very/long/path",
///   "created_at": "2026-01-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 for a malformed body, URL or custom code
/// - 409 if the custom code is already taken
/// - 500 if no free code could be allocated or the store failed
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let summary = state.link_service.create(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(summary.into())))
}
