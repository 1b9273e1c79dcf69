mod common;

use axum::http::{Method, StatusCode};

use common::app::{spawn_test_server, spawn_test_server_with_limits};
use common::auth::{auth_header, register_and_get_token};
use common::http::{request, response_json};

#[tokio::test]
async fn it_rate_limit_triggers_429_with_headers() {
    let app = spawn_test_server_with_limits(3).await;

    let mut final_status = StatusCode::OK;
    let mut final_headers = axum::http::HeaderMap::new();
    let mut final_body = serde_json::json!({});

    for _ in 0..4 {
        let response = request(&app.app, Method::GET, "/api/problems/tags", None, &[]).await;

        let (status, headers, body) = response_json(response).await;
        final_status = status;
        final_headers = headers;
        final_body = body;
    }

    assert_eq!(final_status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(final_body["code"], "RATE_LIMITED");
    assert!(final_headers.get("retry-after").is_some());
    assert!(final_headers.get("ratelimit-limit").is_some());
    assert!(final_headers.get("ratelimit-remaining").is_some());
    assert!(final_headers.get("ratelimit-reset").is_some());
}

#[tokio::test]
async fn it_health_is_not_rate_limited() {
    let app = spawn_test_server_with_limits(2).await;

    for _ in 0..5 {
        let response = request(&app.app, Method::GET, "/health/live", None, &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn it_successful_requests_carry_rate_limit_headers() {
    let app = spawn_test_server().await;
    let token = register_and_get_token(&app.app).await;

    let response = request(
        &app.app,
        Method::GET,
        "/api/profile",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, headers, _) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get("ratelimit-limit").is_some());
    assert!(headers.get("ratelimit-remaining").is_some());
}
