//! Bearer token authentication for admin routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::error::AppError;
use crate::state::{AppState, token_digest};

/// Requires `Authorization: Bearer <ADMIN_TOKEN>` when an admin token is configured.
///
/// The presented token is hashed with SHA-256 and compared with the digest
/// held in [`AppState`]. With no admin token configured, requests pass through.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing, malformed, or
/// carries the wrong token.
///
/// # Example
///
/// ```rust,ignore
/// let admin = Router::new()
///     .route("/clean", post(cleanup_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = st.admin_token_digest else {
        return Ok(next.run(req).await);
    };

    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    if token_digest(&token) != expected {
        return Err(AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Invalid admin token"}),
        ));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}
