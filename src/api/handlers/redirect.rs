//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Resolution is cache-aside; see [`crate::application::services::LinkService::resolve`].
///
/// # Errors
///
/// - 404 if the code is unknown
/// - 410 if the link has expired
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target_url = state.link_service.resolve(&code).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, target_url)]))
}
