use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::catalog::types::{Problem, RatingChange, UpstreamUser};
use crate::config::CodeforcesConfig;

/// Client for the upstream problem-catalog and profile API.
///
/// Every call is a one-shot request: no retries, no pagination (the upstream
/// returns complete result sets in one response). `mock=true` serves
/// deterministic built-in fixtures instead of touching the network, the same
/// way the test and offline-dev environments run.
#[derive(Debug, Clone)]
pub struct CodeforcesClient {
    config: CodeforcesConfig,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Envelope `status != "OK"`: the upstream understood the request and
    /// rejected it (e.g. unknown handle). Semantically a validation error.
    #[error("upstream rejected request: {comment}")]
    Rejected { comment: String },
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream network error: {0}")]
    Network(String),
    #[error("upstream response decode error: {0}")]
    Decode(String),
}

/// The upstream wraps every payload in `{status, comment?, result?}`.
/// The optional fields stay plain `Option`s: a `default` attribute here would
/// put a `Default` bound on `T`, which the payload types do not carry.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    comment: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemsetResult {
    problems: Vec<Problem>,
    #[serde(default)]
    problem_statistics: Vec<ProblemStatistics>,
}

/// Solved counts arrive in a parallel array keyed by (contestId, index).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemStatistics {
    contest_id: i64,
    index: String,
    solved_count: u64,
}

impl CodeforcesClient {
    pub fn new(config: &CodeforcesConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: config.clone(),
            client,
        }
    }

    pub fn is_mock(&self) -> bool {
        self.config.mock
    }

    /// Fetch the complete problem catalog, with solved counts merged in.
    pub async fn problemset_problems(&self) -> Result<Vec<Problem>, UpstreamError> {
        if self.config.mock {
            return Ok(mock_catalog().clone());
        }

        let url = format!("{}/problemset.problems", self.config.api_url);
        let result: ProblemsetResult = self.get_envelope(&url).await?;

        let counts: HashMap<(i64, String), u64> = result
            .problem_statistics
            .into_iter()
            .map(|s| ((s.contest_id, s.index), s.solved_count))
            .collect();

        let mut problems = result.problems;
        for problem in &mut problems {
            if let Some(count) = counts.get(&(problem.contest_id, problem.index.clone())) {
                problem.solved_count = Some(*count);
            }
        }
        Ok(problems)
    }

    /// Resolve a handle to its current profile snapshot.
    pub async fn user_info(&self, handle: &str) -> Result<UpstreamUser, UpstreamError> {
        if self.config.mock {
            return mock_user(handle);
        }

        let url = format!("{}/user.info?handles={}", self.config.api_url, handle);
        let users: Vec<UpstreamUser> = self.get_envelope(&url).await?;
        users.into_iter().next().ok_or(UpstreamError::Rejected {
            comment: format!("handles: User with handle {handle} not found"),
        })
    }

    /// Chronological rating-change events for a handle.
    pub async fn user_rating(&self, handle: &str) -> Result<Vec<RatingChange>, UpstreamError> {
        if self.config.mock {
            // Same not-found semantics as user.info
            mock_user(handle)?;
            return Ok(mock_rating_history());
        }

        let url = format!("{}/user.rating?handle={}", self.config.api_url, handle);
        self.get_envelope(&url).await
    }

    async fn get_envelope<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        if envelope.status != "OK" {
            return Err(UpstreamError::Rejected {
                comment: envelope
                    .comment
                    .unwrap_or_else(|| "upstream returned FAILED without comment".to_string()),
            });
        }

        envelope
            .result
            .ok_or_else(|| UpstreamError::Decode("status OK but result missing".to_string()))
    }
}

fn classify_transport_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Network(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Mock fixtures
// ---------------------------------------------------------------------------

fn fixture(
    contest_id: i64,
    index: &str,
    name: &str,
    rating: Option<i32>,
    tags: &[&str],
    solved_count: Option<u64>,
) -> Problem {
    Problem {
        contest_id,
        index: index.to_string(),
        name: name.to_string(),
        rating,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        solved_count,
    }
}

/// Deterministic catalog spanning 800-2000 plus one unrated problem, with
/// rating ties so ordering behavior stays observable in tests.
static MOCK_CATALOG: Lazy<Vec<Problem>> = Lazy::new(|| {
    vec![
        fixture(1700, "A", "Beautiful Sequence", Some(800), &["greedy", "sortings"], Some(21403)),
        fixture(1700, "B", "Odd Sum Pairs", Some(900), &["math", "brute force"], Some(18777)),
        fixture(1701, "A", "Grid Paths", Some(1000), &["dp", "math"], Some(15012)),
        fixture(1701, "B", "Two Arrays", Some(1000), &["two pointers"], None),
        fixture(1702, "C", "Train Routes", Some(1200), &["implementation"], Some(9870)),
        fixture(1702, "D", "Toy Blocks", Some(1300), &["greedy", "math"], None),
        fixture(1703, "E", "Tree Queries", Some(1500), &["trees", "dfs and similar"], Some(4211)),
        fixture(1704, "C", "Virus Spread", Some(1500), &["greedy", "implementation"], None),
        fixture(1703, "F", "Edge Colorings", Some(1600), &["graphs", "constructive algorithms"], None),
        fixture(1704, "E", "Count Descendants", Some(1900), &["trees", "dp"], Some(1522)),
        fixture(1705, "F", "Mark and Lightbulbs", Some(2000), &["bitmasks", "constructive algorithms"], None),
        fixture(1705, "G", "Guess the Permutation", None, &["interactive"], None),
    ]
});

fn mock_catalog() -> &'static Vec<Problem> {
    &MOCK_CATALOG
}

fn mock_user(handle: &str) -> Result<UpstreamUser, UpstreamError> {
    match handle {
        "alice" => Ok(UpstreamUser {
            handle: "alice".to_string(),
            rating: Some(1536),
            max_rating: Some(1621),
            rank: Some("specialist".to_string()),
            avatar: Some("https://example.com/alice.png".to_string()),
        }),
        "bob" => Ok(UpstreamUser {
            handle: "bob".to_string(),
            rating: Some(1102),
            max_rating: Some(1250),
            rank: Some("newbie".to_string()),
            avatar: None,
        }),
        // Unrated but existing handle
        "charlie" => Ok(UpstreamUser {
            handle: "charlie".to_string(),
            rating: None,
            max_rating: None,
            rank: None,
            avatar: None,
        }),
        _ => Err(UpstreamError::Rejected {
            comment: format!("handles: User with handle {handle} not found"),
        }),
    }
}

fn mock_rating_history() -> Vec<RatingChange> {
    vec![
        RatingChange {
            contest_id: 1700,
            contest_name: "Round #801 (Div. 2)".to_string(),
            rating_update_time_seconds: 1_655_000_000,
            old_rating: 1450,
            new_rating: 1500,
        },
        RatingChange {
            contest_id: 1703,
            contest_name: "Round #805 (Div. 2)".to_string(),
            rating_update_time_seconds: 1_657_500_000,
            old_rating: 1500,
            new_rating: 1536,
        },
    ]
}
