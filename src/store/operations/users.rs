use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let email_key = keys::user_email_index_key(&user.email);

        // Atomic compare-and-swap: only insert if the email key does not exist.
        // This prevents the race where two concurrent registrations with the
        // same email both pass an existence check.
        let cas_result = self
            .users
            .compare_and_swap(
                email_key.as_bytes(),
                None::<&[u8]>,
                Some(user.id.as_bytes().to_vec()),
            )
            .map_err(StoreError::Sled)?;

        if cas_result.is_err() {
            return Err(StoreError::Conflict {
                entity: "user_email".to_string(),
                key: user.email.clone(),
            });
        }

        let user_key = keys::user_key(&user.id);
        let user_bytes = Self::serialize(user)?;
        if let Err(e) = self.users.insert(user_key.as_bytes(), user_bytes) {
            let _ = self.users.remove(email_key.as_bytes());
            return Err(StoreError::Sled(e));
        }

        Ok(())
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let key = keys::user_key(user_id);
        match self.users.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let index_key = keys::user_email_index_key(email);
        let Some(user_id_raw) = self.users.get(index_key.as_bytes())? else {
            return Ok(None);
        };
        let user_id = match String::from_utf8(user_id_raw.to_vec()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid UTF-8 in user email index");
                return Ok(None);
            }
        };
        self.get_user_by_id(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = Store::open(tmp.path().join("users.sled").to_str().unwrap()).unwrap();
        (tmp, store)
    }

    fn sample_user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            email: email.to_string(),
            username: "sample".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_fetch_by_id_and_email() {
        let (_tmp, store) = temp_store();
        store.create_user(&sample_user("u1", "A@Ex.com")).unwrap();

        assert_eq!(store.get_user_by_id("u1").unwrap().unwrap().id, "u1");
        // Email lookup is case-insensitive via the normalized index
        assert_eq!(
            store.get_user_by_email("a@ex.com").unwrap().unwrap().id,
            "u1"
        );
    }

    #[test]
    fn duplicate_email_conflicts() {
        let (_tmp, store) = temp_store();
        store.create_user(&sample_user("u1", "a@ex.com")).unwrap();
        let err = store
            .create_user(&sample_user("u2", "a@ex.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn missing_user_is_none() {
        let (_tmp, store) = temp_store();
        assert!(store.get_user_by_id("nope").unwrap().is_none());
        assert!(store.get_user_by_email("nope@ex.com").unwrap().is_none());
    }
}
