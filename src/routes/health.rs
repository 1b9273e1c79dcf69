use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::catalog::cache::CatalogStatus;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/database", get(database_health))
}

/// Summarize the catalog cache without dumping the problem list.
async fn catalog_summary(state: &AppState) -> serde_json::Value {
    match state.catalog().status().await {
        CatalogStatus::Pending => serde_json::json!({ "state": "pending" }),
        CatalogStatus::Ready { problems } => serde_json::json!({
            "state": "ready",
            "problemCount": problems,
        }),
        CatalogStatus::Failed { error } => serde_json::json!({
            "state": "failed",
            "error": error,
        }),
    }
}

pub async fn health_check(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let catalog = catalog_summary(&state).await;
    Json(serde_json::json!({
        "status": "ok",
        "uptimeSecs": state.uptime_secs(),
        "store": {
            "healthy": true,
        },
        "catalog": catalog,
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    // 就绪性只依赖本地存储；目录缓存是按需拉取的，不阻塞就绪。
    if state.store().get_user_by_id("__health_check__").is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

pub async fn database_health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let start = Instant::now();
    let healthy = state.store().get_user_by_id("__health_check__").is_ok();
    let latency_us = start.elapsed().as_micros() as u64;

    Json(serde_json::json!({
        "healthy": healthy,
        "latencyUs": latency_us,
    }))
}
