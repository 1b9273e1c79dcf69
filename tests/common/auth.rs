use axum::http::Method;
use axum::Router;

use super::http::{request, response_json};

/// Register a fresh user and return their bearer token.
pub async fn register_and_get_token(app: &Router) -> String {
    let email = format!("user-{}@test.com", uuid::Uuid::new_v4());
    let username = format!("user-{}", uuid::Uuid::new_v4().simple());
    register_with(app, &email, &username, "Passw0rd!").await
}

pub async fn register_with(app: &Router, email: &str, username: &str, password: &str) -> String {
    let response = request(
        app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": email,
            "username": username,
            "password": password,
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(response).await;
    assert!(status.is_success(), "register failed: {body}");

    body["data"]["accessToken"]
        .as_str()
        .expect("access token in register response")
        .to_string()
}

pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}
