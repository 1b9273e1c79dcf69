use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::catalog::filter;
use crate::catalog::types::{Problem, RatingWindow};
use crate::constants::{DEFAULT_BASELINE_RATING, MAX_PROBLEMS_LIMIT, PROBLEM_TAGS};
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recommend", get(recommend))
        .route("/range", get(range))
        .route("/tags", get(tags))
}

/// A catalog entry as rendered to the client: the raw problem plus its
/// composite id and the user's saved marker. The marker comes from the
/// bookmark membership set, never from the filter itself.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemView {
    contest_id: i64,
    index: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<i32>,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solved_count: Option<u64>,
    problem_id: String,
    saved: bool,
}

impl ProblemView {
    fn new(problem: Problem, saved_ids: &HashSet<String>) -> Self {
        let problem_id = problem.problem_id();
        let saved = saved_ids.contains(&problem_id);
        Self {
            contest_id: problem.contest_id,
            index: problem.index,
            name: problem.name,
            rating: problem.rating,
            tags: problem.tags,
            solved_count: problem.solved_count,
            problem_id,
            saved,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemListResponse {
    problems: Vec<ProblemView>,
    min_rating: i32,
    max_rating: i32,
}

/// Comma-separated `tags` query parameter -> owned tag list.
fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn clamp_limit(limit: Option<usize>) -> Option<usize> {
    limit.map(|l| l.clamp(1, MAX_PROBLEMS_LIMIT))
}

/// Load the catalog snapshot, fetching it on first use. A transport failure
/// here surfaces as 502; the presentation side shows its error state and the
/// next request starts a fresh fetch.
async fn catalog_snapshot(state: &AppState) -> Result<Arc<Vec<Problem>>, AppError> {
    state
        .catalog()
        .get_or_fetch(state.codeforces())
        .await
        .map_err(AppError::from)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendQuery {
    rating: Option<i32>,
    offset: Option<i32>,
    tags: Option<String>,
    limit: Option<usize>,
}

async fn recommend(
    auth: AuthUser,
    Query(q): Query<RecommendQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = catalog_snapshot(&state).await?;

    // Center defaults to the linked profile's rating, then the baseline —
    // the dashboard's "problems near my level" view.
    let rating = match q.rating {
        Some(r) => r,
        None => state
            .store()
            .get_profile(&auth.user_id)?
            .and_then(|p| p.current_rating)
            .unwrap_or(DEFAULT_BASELINE_RATING),
    };
    let offset = q.offset.unwrap_or(0);
    let tags = parse_tags(q.tags.as_deref());

    let problems = filter::recommend_by_offset(&catalog, rating, offset, &tags, clamp_limit(q.limit));
    let window = RatingWindow::around(rating, offset);

    let saved_ids = state.store().bookmarked_problem_ids(&auth.user_id)?;
    Ok(ok(ProblemListResponse {
        problems: problems
            .into_iter()
            .map(|p| ProblemView::new(p, &saved_ids))
            .collect(),
        min_rating: window.min,
        max_rating: window.max,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeQuery {
    min_rating: i32,
    max_rating: i32,
    tags: Option<String>,
    limit: Option<usize>,
}

async fn range(
    auth: AuthUser,
    Query(q): Query<RangeQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = catalog_snapshot(&state).await?;
    let tags = parse_tags(q.tags.as_deref());

    let problems = filter::problems_in_range(
        &catalog,
        q.min_rating,
        q.max_rating,
        &tags,
        clamp_limit(q.limit),
    );

    let saved_ids = state.store().bookmarked_problem_ids(&auth.user_id)?;
    Ok(ok(ProblemListResponse {
        problems: problems
            .into_iter()
            .map(|p| ProblemView::new(p, &saved_ids))
            .collect(),
        min_rating: q.min_rating,
        max_rating: q.max_rating,
    }))
}

async fn tags(_auth: AuthUser) -> impl IntoResponse {
    ok(PROBLEM_TAGS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_param_is_split_and_trimmed() {
        assert_eq!(
            parse_tags(Some("math, dp ,,greedy")),
            vec!["math", "dp", "greedy"]
        );
        assert!(parse_tags(None).is_empty());
        assert!(parse_tags(Some("")).is_empty());
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(Some(0)), Some(1));
        assert_eq!(clamp_limit(Some(5000)), Some(MAX_PROBLEMS_LIMIT));
        assert_eq!(clamp_limit(None), None);
    }
}
