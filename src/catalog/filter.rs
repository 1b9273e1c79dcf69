//! Practice-problem selection over an in-memory catalog snapshot.
//!
//! Two query modes share one inclusion predicate and differ only in how the
//! window is built and how results are ordered:
//!
//! - offset-window: window derived from a center rating ± an offset, widened
//!   by ±100; results keep catalog encounter order (never re-sorted);
//! - absolute-range: caller-literal bounds; results sorted ascending by
//!   rating, stable on ties, so callers can show a difficulty gradient.
//!
//! The order asymmetry is deliberate-as-shipped behavior and must not be
//! unified: doing so would change observable output order.

use crate::catalog::types::{Problem, RatingWindow};
use crate::constants::{DEFAULT_RANGE_LIMIT, DEFAULT_RECOMMEND_LIMIT};

/// The shared inclusion predicate: rating present, rating inside the window
/// (inclusive), and — when a non-empty tag set is given — at least one tag in
/// common (OR semantics, not AND). Unrated problems never match.
pub fn matches(problem: &Problem, window: RatingWindow, tags: &[String]) -> bool {
    let Some(rating) = problem.rating else {
        return false;
    };
    if !window.contains(rating) {
        return false;
    }
    if tags.is_empty() {
        return true;
    }
    tags.iter().any(|tag| problem.tags.iter().any(|t| t == tag))
}

/// Offset-window mode: "problems near my level ± a nudge".
///
/// Returns the first `limit` matching problems in catalog encounter order.
/// An empty result is a normal "no matches", not an error.
pub fn recommend_by_offset(
    catalog: &[Problem],
    rating: i32,
    offset: i32,
    tags: &[String],
    limit: Option<usize>,
) -> Vec<Problem> {
    let window = RatingWindow::around(rating, offset);
    let limit = limit.unwrap_or(DEFAULT_RECOMMEND_LIMIT);

    catalog
        .iter()
        .filter(|p| matches(p, window, tags))
        .take(limit)
        .cloned()
        .collect()
}

/// Absolute-range mode: "everything in this band, cheapest first".
///
/// Same predicate as [`recommend_by_offset`] with literal bounds, then a
/// stable ascending sort by rating before truncation, so equal ratings keep
/// their catalog order.
pub fn problems_in_range(
    catalog: &[Problem],
    min_rating: i32,
    max_rating: i32,
    tags: &[String],
    limit: Option<usize>,
) -> Vec<Problem> {
    let window = RatingWindow::bounded(min_rating, max_rating);
    let limit = limit.unwrap_or(DEFAULT_RANGE_LIMIT);

    let mut filtered: Vec<Problem> = catalog
        .iter()
        .filter(|p| matches(p, window, tags))
        .cloned()
        .collect();

    // matches() guarantees rating is present; unwrap_or(0) only keeps the
    // sort total if that invariant ever breaks.
    filtered.sort_by_key(|p| p.rating.unwrap_or(0));
    filtered.truncate(limit);
    filtered
}
