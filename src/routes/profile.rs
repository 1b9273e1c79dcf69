use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;

use chrono::Utc;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::catalog::types::{rank_name, UpstreamUser};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::services::codeforces::UpstreamError;
use crate::state::AppState;
use crate::store::operations::profiles::Profile;
use crate::validation::validate_handle;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/handle", put(set_handle))
        .route("/refresh", post(refresh_profile))
        .route("/rating-history", get(rating_history))
}

async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state
        .store()
        .get_profile(&auth.user_id)?
        .unwrap_or_else(|| Profile::empty(&auth.user_id));
    Ok(ok(profile))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetHandleRequest {
    handle: String,
}

/// Build the stored snapshot from an upstream profile record. The upstream
/// omits `rank` for unrated users; derive a label from the rating when both
/// are present but rank is not.
fn snapshot_from_upstream(user_id: &str, upstream: UpstreamUser) -> Profile {
    let rank = upstream
        .rank
        .or_else(|| upstream.rating.map(|r| rank_name(r).to_lowercase()));
    Profile {
        user_id: user_id.to_string(),
        handle: Some(upstream.handle),
        current_rating: upstream.rating,
        max_rating: upstream.max_rating,
        rank,
        avatar_url: upstream.avatar,
        updated_at: Utc::now(),
    }
}

/// Fetch the handle's snapshot upstream and persist it. An unknown handle is
/// a validation error, not a transport failure.
async fn link_handle(
    state: &AppState,
    user_id: &str,
    handle: &str,
) -> Result<Profile, AppError> {
    let upstream = match state.codeforces().user_info(handle).await {
        Ok(user) => user,
        Err(UpstreamError::Rejected { comment }) => {
            tracing::warn!(handle, %comment, "Handle rejected by upstream");
            return Err(AppError::bad_request("INVALID_HANDLE", "Unknown handle"));
        }
        Err(e) => return Err(e.into()),
    };

    let profile = snapshot_from_upstream(user_id, upstream);
    state.store().upsert_profile(&profile)?;
    Ok(profile)
}

async fn set_handle(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SetHandleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let handle = req.handle.trim();
    validate_handle(handle).map_err(|msg| AppError::bad_request("INVALID_HANDLE", msg))?;

    let profile = link_handle(&state, &auth.user_id, handle).await?;
    tracing::info!(user_id = %auth.user_id, handle, "Handle linked");
    Ok(ok(profile))
}

async fn refresh_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stored = state
        .store()
        .get_profile(&auth.user_id)?
        .and_then(|p| p.handle);
    let Some(handle) = stored else {
        return Err(AppError::bad_request("NO_HANDLE", "No handle linked yet"));
    };

    let profile = link_handle(&state, &auth.user_id, &handle).await?;
    Ok(ok(profile))
}

async fn rating_history(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stored = state
        .store()
        .get_profile(&auth.user_id)?
        .and_then(|p| p.handle);
    let Some(handle) = stored else {
        return Err(AppError::bad_request("NO_HANDLE", "No handle linked yet"));
    };

    let history = state.codeforces().user_rating(&handle).await?;
    Ok(ok(history))
}
