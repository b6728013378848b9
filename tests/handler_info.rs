mod common;

use chrono::{Duration, Utc};

#[tokio::test]
async fn test_info_returns_metadata() {
    let ctx = common::create_test_state(None).await;
    ctx.repo.seed("info01", "https://example.com/info", None);
    let server = common::test_server(ctx.state);

    server.get("/info01").await;
    let response = server.get("/api/v1/info/info01").await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["short_code"], "info01");
    assert_eq!(body["original_url"], "https://example.com/info");
    assert_eq!(body["access_count"], 1);
    assert!(body["created_at"].is_string());
    assert!(body.get("expires_at").is_none());
}

#[tokio::test]
async fn test_info_does_not_count_access() {
    let ctx = common::create_test_state(None).await;
    ctx.repo.seed("info02", "https://example.com", None);
    let server = common::test_server(ctx.state);

    server.get("/api/v1/info/info02").await;
    server.get("/api/v1/info/info02").await;

    assert_eq!(ctx.repo.access_count("info02"), Some(0));
}

#[tokio::test]
async fn test_info_includes_expired_links() {
    let ctx = common::create_test_state(None).await;
    ctx.repo.seed(
        "info03",
        "https://example.com",
        Some(Utc::now() - Duration::minutes(5)),
    );
    let server = common::test_server(ctx.state);

    let response = server.get("/api/v1/info/info03").await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn test_info_not_found() {
    let ctx = common::create_test_state(None).await;
    let server = common::test_server(ctx.state);

    let response = server.get("/api/v1/info/missing").await;

    assert_eq!(response.status_code(), 404);
}
