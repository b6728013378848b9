//! Handler for link metadata.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::info::LinkInfoResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns stored metadata for a code.
///
/// # Endpoint
///
/// `GET /api/v1/info/{code}`
///
/// Expired links are still visible here.
pub async fn info_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkInfoResponse>, AppError> {
    let link = state.link_service.info(&code).await?;
    Ok(Json(link.into()))
}
