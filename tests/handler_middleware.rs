mod common;

use axum::http::{Method, header};
use std::time::Duration;

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let ctx = common::create_test_state(None).await;
    let server = common::test_server(ctx.state);

    let response = server.get("/api/v1/stats/").await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["total_links"], 0);
}

#[tokio::test]
async fn test_request_deadline_answers_internal_error() {
    let ctx = common::create_test_state(None).await;
    ctx.repo.stall_stats(Duration::from_secs(3));

    let mut config = common::test_config();
    config.request_timeout_seconds = 1;
    let server = common::test_server_with_config(ctx.state, &config);

    let response = server.get("/api/v1/stats").await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "internal_error");
    assert_eq!(body["error"]["message"], "Request timed out");
}

#[tokio::test]
async fn test_requests_within_deadline_succeed() {
    let ctx = common::create_test_state(None).await;
    ctx.repo.stall_stats(Duration::from_millis(50));

    let mut config = common::test_config();
    config.request_timeout_seconds = 1;
    let server = common::test_server_with_config(ctx.state, &config);

    server.get("/api/v1/stats").await.assert_status_ok();
}

#[tokio::test]
async fn test_cors_preflight() {
    let ctx = common::create_test_state(None).await;
    let server = common::test_server(ctx.state);

    let response = server
        .method(Method::OPTIONS, "/api/v1/shorten")
        .add_header(header::ORIGIN, "https://app.example.org")
        .add_header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .add_header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .await;

    assert_eq!(response.status_code(), 204);
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");

    let methods = response.header(header::ACCESS_CONTROL_ALLOW_METHODS);
    let methods = methods.to_str().unwrap();
    assert!(methods.contains("GET"));
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
}

#[tokio::test]
async fn test_cors_headers_on_regular_requests() {
    let ctx = common::create_test_state(None).await;
    ctx.repo.seed("cors01", "https://example.com", None);
    let server = common::test_server(ctx.state);

    let response = server
        .get("/api/v1/info/cors01")
        .add_header(header::ORIGIN, "https://app.example.org")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
}

#[tokio::test]
async fn test_rate_limit_rejects_burst_overflow() {
    let ctx = common::create_test_state(None).await;

    let mut config = common::test_config();
    config.rate_limit_per_second = 1;
    config.rate_limit_burst = 1;
    let server = common::test_server_with_config(ctx.state, &config);

    server.get("/api/v1/stats").await.assert_status_ok();
    let limited = server.get("/api/v1/stats").await;

    assert_eq!(limited.status_code(), 429);
}

#[tokio::test]
async fn test_rate_limit_does_not_cover_redirects() {
    let ctx = common::create_test_state(None).await;
    ctx.repo.seed("fast01", "https://example.com", None);

    let mut config = common::test_config();
    config.rate_limit_per_second = 1;
    config.rate_limit_burst = 1;
    let server = common::test_server_with_config(ctx.state, &config);

    for _ in 0..3 {
        assert_eq!(server.get("/fast01").await.status_code(), 302);
    }
}
