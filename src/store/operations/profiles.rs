use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// Cached snapshot of the linked competitive-programming profile.
/// All upstream fields are optional: a fresh account has no handle, and an
/// unrated handle has no rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub handle: Option<String>,
    pub current_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub rank: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            handle: None,
            current_rating: None,
            max_rating: None,
            rank: None,
            avatar_url: None,
            updated_at: Utc::now(),
        }
    }
}

impl Store {
    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let key = keys::profile_key(user_id);
        match self.profiles.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let key = keys::profile_key(&profile.user_id);
        self.profiles
            .insert(key.as_bytes(), Self::serialize(profile)?)?;
        Ok(())
    }
}
