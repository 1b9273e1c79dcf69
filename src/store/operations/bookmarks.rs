use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// A saved problem. Denormalized snapshot of the catalog entry at save time:
/// the catalog is refetched per process while bookmarks persist, so a bookmark
/// must stay displayable even if the catalog copy is gone or changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    /// Composite `{contestId}-{index}` identifier, unique per user.
    pub problem_id: String,
    pub problem_name: String,
    pub problem_rating: Option<i32>,
    pub problem_tags: Vec<String>,
    pub contest_id: i64,
    pub problem_index: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// Insert a bookmark. Uniqueness on (user, problem_id) is enforced here
    /// with a compare-and-swap, not by the callers.
    pub fn create_bookmark(&self, bookmark: &Bookmark) -> Result<(), StoreError> {
        let key = keys::bookmark_key(&bookmark.user_id, &bookmark.problem_id);
        let bytes = Self::serialize(bookmark)?;

        let cas_result = self
            .bookmarks
            .compare_and_swap(key.as_bytes(), None::<&[u8]>, Some(bytes))
            .map_err(StoreError::Sled)?;

        if cas_result.is_err() {
            return Err(StoreError::Conflict {
                entity: "bookmark".to_string(),
                key: bookmark.problem_id.clone(),
            });
        }

        Ok(())
    }

    /// Delete one bookmark. Returns whether it existed.
    pub fn delete_bookmark(&self, user_id: &str, problem_id: &str) -> Result<bool, StoreError> {
        let key = keys::bookmark_key(user_id, problem_id);
        Ok(self.bookmarks.remove(key.as_bytes())?.is_some())
    }

    /// All bookmarks for a user, newest first.
    pub fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, StoreError> {
        let prefix = keys::bookmark_prefix(user_id);
        let mut bookmarks = Vec::new();
        for item in self.bookmarks.scan_prefix(prefix.as_bytes()) {
            let (_, raw) = item?;
            bookmarks.push(Self::deserialize::<Bookmark>(&raw)?);
        }
        bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookmarks)
    }

    /// Membership set for the saved-marker predicate: the set of problem_ids
    /// the user has bookmarked, for O(1) lookups while rendering problem lists.
    pub fn bookmarked_problem_ids(&self, user_id: &str) -> Result<HashSet<String>, StoreError> {
        let prefix = keys::bookmark_prefix(user_id);
        let mut ids = HashSet::new();
        for item in self.bookmarks.scan_prefix(prefix.as_bytes()) {
            let (_, raw) = item?;
            let bookmark: Bookmark = Self::deserialize(&raw)?;
            ids.insert(bookmark.problem_id);
        }
        Ok(ids)
    }
}
