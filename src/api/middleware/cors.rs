//! Cross-origin access for browser clients.

use axum::{
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};

/// Allows any origin to call the API with `GET`, `POST` and `OPTIONS`.
///
/// Credentials are not allowed, since the origin is a wildcard. Admin
/// clients send their token in `Authorization`, which is listed as an
/// allowed request header.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CACHE_CONTROL,
        ])
}

/// Answers preflight requests with `204 No Content`.
///
/// Must wrap [`layer`], which short-circuits `OPTIONS` with an empty `200`.
pub async fn preflight_status(req: Request, next: Next) -> Response {
    let is_preflight = req.method() == Method::OPTIONS;
    let mut response = next.run(req).await;

    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }

    response
}
