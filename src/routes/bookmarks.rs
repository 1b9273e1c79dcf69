use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::Router;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::bookmarks::Bookmark;
use crate::store::StoreError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookmarks).post(save_bookmark))
        .route("/:problem_id", delete(remove_bookmark))
}

async fn list_bookmarks(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let bookmarks = state.store().list_bookmarks(&auth.user_id)?;
    Ok(ok(bookmarks))
}

/// 保存时客户端把目录条目快照一并提交：目录是进程级缓存、随时会重取，
/// 书签必须自带展示所需的字段。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveBookmarkRequest {
    contest_id: i64,
    index: String,
    name: String,
    rating: Option<i32>,
    #[serde(default)]
    tags: Vec<String>,
}

async fn save_bookmark(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SaveBookmarkRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.index.trim().is_empty() || body.name.trim().is_empty() {
        return Err(AppError::bad_request(
            "VALIDATION_ERROR",
            "Problem index and name are required",
        ));
    }

    let problem_id = format!("{}-{}", body.contest_id, body.index);
    let bookmark = Bookmark {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user_id.clone(),
        problem_id: problem_id.clone(),
        problem_name: body.name,
        problem_rating: body.rating,
        problem_tags: body.tags,
        contest_id: body.contest_id,
        problem_index: body.index,
        created_at: Utc::now(),
    };

    match state.store().create_bookmark(&bookmark) {
        Ok(()) => {}
        Err(StoreError::Conflict { .. }) => {
            return Err(AppError::conflict(
                "ALREADY_SAVED",
                "Problem is already bookmarked",
            ));
        }
        Err(other) => return Err(other.into()),
    }

    tracing::info!(user_id = %auth.user_id, problem_id = %problem_id, "Bookmark saved");
    Ok(created(bookmark))
}

async fn remove_bookmark(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = state.store().delete_bookmark(&auth.user_id, &problem_id)?;
    if !removed {
        return Err(AppError::not_found("Bookmark not found"));
    }
    Ok(ok(serde_json::json!({ "removed": true, "problemId": problem_id })))
}
