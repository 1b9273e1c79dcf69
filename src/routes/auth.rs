use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{
    extract_token_from_headers, generate_dummy_argon2_hash, hash_password, hash_token,
    sign_jwt_for_user, verify_password, AuthUser,
};
use crate::constants::MAX_SESSIONS_PER_USER;
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::sessions::Session;
use crate::store::operations::users::User;
use crate::store::StoreError;
use crate::validation::{is_valid_email, validate_password, validate_username};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub email: String,
    pub username: String,
}

impl From<&User> for AccountView {
    fn from(value: &User) -> Self {
        Self {
            id: value.id.clone(),
            email: value.email.clone(),
            username: value.username.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: AccountView,
}

/// Sign an access token and persist its session record.
fn issue_token(user_id: &str, state: &AppState) -> Result<String, AppError> {
    // 清理超出限制的旧会话
    if let Err(e) = state
        .store()
        .cleanup_oldest_user_sessions(user_id, MAX_SESSIONS_PER_USER)
    {
        tracing::warn!(user_id, error = %e, "Failed to trim user sessions");
    }

    let access_token = sign_jwt_for_user(
        user_id,
        &state.config().jwt_secret,
        state.config().jwt_expires_in_hours,
    )?;

    let token_hash = hash_token(&access_token);
    state.store().create_session(&Session {
        token_hash,
        user_id: user_id.to_string(),
        created_at: Utc::now(),
        expires_at: Utc::now() + Duration::hours(state.config().jwt_expires_in_hours as i64),
        revoked: false,
    })?;

    Ok(access_token)
}

async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("INVALID_EMAIL", "Invalid email address"));
    }
    validate_username(req.username.trim())
        .map_err(|msg| AppError::bad_request("INVALID_USERNAME", msg))?;
    validate_password(&req.password)
        .map_err(|msg| AppError::bad_request("WEAK_PASSWORD", msg))?;

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        username: req.username.trim().to_string(),
        password_hash: hash_password(&req.password)?,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    match state.store().create_user(&user) {
        Ok(()) => {}
        Err(StoreError::Conflict { .. }) => {
            return Err(AppError::conflict(
                "EMAIL_TAKEN",
                "An account with this email already exists",
            ));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %user.id, "User registered");
    let access_token = issue_token(&user.id, &state)?;
    Ok(created(AuthResponse {
        access_token,
        user: AccountView::from(&user),
    }))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    let user = state.store().get_user_by_email(&email)?;

    // 账户不存在时也执行一次 argon2 校验，避免通过响应时间枚举邮箱
    let Some(user) = user else {
        let _ = verify_password(&req.password, &generate_dummy_argon2_hash());
        return Err(AppError::unauthorized("Invalid email or password"));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let access_token = issue_token(&user.id, &state)?;
    Ok(ok(AuthResponse {
        access_token,
        user: AccountView::from(&user),
    }))
}

async fn logout(
    _auth: AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = extract_token_from_headers(&headers)?;
    state.store().delete_session(&hash_token(&token))?;
    Ok(ok(serde_json::json!({ "loggedOut": true })))
}
