mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_server;
use common::auth::{auth_header, register_and_get_token};
use common::http::{assert_json_error, assert_status_ok_json, json_data, request, response_json};

#[tokio::test]
async fn it_fresh_profile_is_empty() {
    let app = spawn_test_server().await;
    let token = register_and_get_token(&app.app).await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/profile",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert!(body["data"]["handle"].is_null());
    assert!(body["data"]["currentRating"].is_null());
}

#[tokio::test]
async fn it_linking_handle_stores_upstream_snapshot() {
    let app = spawn_test_server().await;
    let token = register_and_get_token(&app.app).await;

    let resp = request(
        &app.app,
        Method::PUT,
        "/api/profile/handle",
        Some(serde_json::json!({ "handle": "alice" })),
        &[("authorization", auth_header(&token))],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["handle"], "alice");
    assert_eq!(body["data"]["currentRating"], 1536);
    assert_eq!(body["data"]["maxRating"], 1621);
    assert_eq!(body["data"]["rank"], "specialist");

    // The snapshot persists across requests
    let resp = request(
        &app.app,
        Method::GET,
        "/api/profile",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["handle"], "alice");
}

#[tokio::test]
async fn it_unknown_handle_is_rejected() {
    let app = spawn_test_server().await;
    let token = register_and_get_token(&app.app).await;

    let resp = request(
        &app.app,
        Method::PUT,
        "/api/profile/handle",
        Some(serde_json::json!({ "handle": "nosuchuser" })),
        &[("authorization", auth_header(&token))],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_HANDLE");
}

#[tokio::test]
async fn it_handle_format_is_validated_before_upstream() {
    let app = spawn_test_server().await;
    let token = register_and_get_token(&app.app).await;

    let resp = request(
        &app.app,
        Method::PUT,
        "/api/profile/handle",
        Some(serde_json::json!({ "handle": "a b c!" })),
        &[("authorization", auth_header(&token))],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_HANDLE");
}

#[tokio::test]
async fn it_unrated_handle_links_with_null_rating() {
    let app = spawn_test_server().await;
    let token = register_and_get_token(&app.app).await;

    let resp = request(
        &app.app,
        Method::PUT,
        "/api/profile/handle",
        Some(serde_json::json!({ "handle": "charlie" })),
        &[("authorization", auth_header(&token))],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["handle"], "charlie");
    assert!(body["data"]["currentRating"].is_null());
    assert!(body["data"]["rank"].is_null());
}

#[tokio::test]
async fn it_refresh_requires_a_linked_handle() {
    let app = spawn_test_server().await;
    let token = register_and_get_token(&app.app).await;

    let resp = request(
        &app.app,
        Method::POST,
        "/api/profile/refresh",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "NO_HANDLE");
}

#[tokio::test]
async fn it_refresh_refetches_the_snapshot() {
    let app = spawn_test_server().await;
    let token = register_and_get_token(&app.app).await;

    let link = request(
        &app.app,
        Method::PUT,
        "/api/profile/handle",
        Some(serde_json::json!({ "handle": "bob" })),
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, _) = response_json(link).await;
    assert!(status.is_success());

    let resp = request(
        &app.app,
        Method::POST,
        "/api/profile/refresh",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["handle"], "bob");
    assert_eq!(body["data"]["currentRating"], 1102);
}

#[tokio::test]
async fn it_rating_history_requires_handle_and_is_chronological() {
    let app = spawn_test_server().await;
    let token = register_and_get_token(&app.app).await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/profile/rating-history",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "NO_HANDLE");

    let link = request(
        &app.app,
        Method::PUT,
        "/api/profile/handle",
        Some(serde_json::json!({ "handle": "alice" })),
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, _) = response_json(link).await;
    assert!(status.is_success());

    let resp = request(
        &app.app,
        Method::GET,
        "/api/profile/rating-history",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    let entries = json_data(&body).as_array().expect("history array");
    assert_eq!(entries.len(), 2);
    let times: Vec<i64> = entries
        .iter()
        .map(|e| e["ratingUpdateTimeSeconds"].as_i64().unwrap())
        .collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}
