use serde::{Deserialize, Serialize};

use crate::constants::RATING_WINDOW_HALF_WIDTH;

/// One catalog entry, as served by the upstream `problemset.problems` call.
/// Immutable once fetched; the whole catalog snapshot is read-only for the
/// lifetime of the process fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub contest_id: i64,
    pub index: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solved_count: Option<u64>,
}

impl Problem {
    /// Composite identifier, unique within the catalog and used as the
    /// bookmark key: `{contestId}-{index}`.
    pub fn problem_id(&self) -> String {
        format!("{}-{}", self.contest_id, self.index)
    }
}

/// Inclusive `[min, max]` difficulty band. Ephemeral: recomputed per filter
/// invocation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingWindow {
    pub min: i32,
    pub max: i32,
}

impl RatingWindow {
    /// Offset-window construction: `center + offset` widened by ±100.
    pub fn around(center: i32, offset: i32) -> Self {
        let target = center.saturating_add(offset);
        Self {
            min: target.saturating_sub(RATING_WINDOW_HALF_WIDTH),
            max: target.saturating_add(RATING_WINDOW_HALF_WIDTH),
        }
    }

    /// Absolute-range construction: caller-literal bounds, no widening.
    pub fn bounded(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, rating: i32) -> bool {
        rating >= self.min && rating <= self.max
    }
}

/// Upstream `user.info` record, only the fields this system consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamUser {
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// One rating-change event from the upstream `user.rating` feed,
/// chronological per contest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    pub contest_id: i64,
    pub contest_name: String,
    pub rating_update_time_seconds: i64,
    pub old_rating: i32,
    pub new_rating: i32,
}

/// Human rank label for a rating, used when the upstream `rank` field is
/// absent from a cached snapshot.
pub fn rank_name(rating: i32) -> &'static str {
    match rating {
        i32::MIN..=1199 => "Newbie",
        1200..=1399 => "Pupil",
        1400..=1599 => "Specialist",
        1600..=1899 => "Expert",
        1900..=2099 => "Candidate Master",
        2100..=2399 => "Master",
        2400..=2599 => "International Master",
        2600..=2999 => "Grandmaster",
        _ => "Legendary Grandmaster",
    }
}
