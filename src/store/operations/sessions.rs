use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl Store {
    pub fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        let key = keys::session_key(&session.token_hash);
        let index_key = keys::session_user_index_key(&session.user_id, &session.token_hash);
        let session_bytes = Self::serialize(session)?;

        let key_bytes = key.as_bytes().to_vec();
        let index_key_bytes = index_key.as_bytes().to_vec();
        self.sessions
            .transaction(move |tx| {
                tx.insert(key_bytes.as_slice(), session_bytes.as_slice())?;
                tx.insert(index_key_bytes.as_slice(), &[] as &[u8])?;
                Ok(())
            })
            .map_err(|e: sled::transaction::TransactionError<()>| match e {
                sled::transaction::TransactionError::Abort(()) => {
                    StoreError::Sled(sled::Error::Unsupported("transaction aborted".into()))
                }
                sled::transaction::TransactionError::Storage(se) => StoreError::Sled(se),
            })?;
        Ok(())
    }

    /// 获取会话，如果已过期或已撤销则返回 None。
    /// 不产生删除副作用——过期会话的清理由后台任务 session_cleanup 负责。
    pub fn get_session(&self, token_hash: &str) -> Result<Option<Session>, StoreError> {
        let key = keys::session_key(token_hash);
        let Some(raw) = self.sessions.get(key.as_bytes())? else {
            return Ok(None);
        };

        let session = Self::deserialize::<Session>(&raw)?;
        if session.revoked || session.expires_at <= Utc::now() {
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn delete_session(&self, token_hash: &str) -> Result<(), StoreError> {
        let key = keys::session_key(token_hash);
        let raw = self.sessions.get(key.as_bytes())?;

        let session_key_bytes = key.as_bytes().to_vec();
        let index_key_bytes = raw
            .as_ref()
            .and_then(|r| Self::deserialize::<Session>(r).ok())
            .map(|session| {
                keys::session_user_index_key(&session.user_id, token_hash)
                    .as_bytes()
                    .to_vec()
            });

        self.sessions
            .transaction(move |tx| {
                if let Some(ref idx_key) = index_key_bytes {
                    tx.remove(idx_key.as_slice())?;
                }
                tx.remove(session_key_bytes.as_slice())?;
                Ok(())
            })
            .map_err(|e: sled::transaction::TransactionError<()>| match e {
                sled::transaction::TransactionError::Abort(()) => {
                    StoreError::Sled(sled::Error::Unsupported("transaction aborted".into()))
                }
                sled::transaction::TransactionError::Storage(se) => StoreError::Sled(se),
            })?;
        Ok(())
    }

    /// 如果用户会话数超过 max_sessions，按创建时间从旧到新清理多余会话
    pub fn cleanup_oldest_user_sessions(
        &self,
        user_id: &str,
        max_sessions: usize,
    ) -> Result<(), StoreError> {
        let prefix = keys::session_user_index_prefix(user_id);
        let mut sessions: Vec<(String, DateTime<Utc>)> = Vec::new();

        for item in self.sessions.scan_prefix(prefix.as_bytes()) {
            let (k, _) = item?;
            let key_str = match String::from_utf8(k.to_vec()) {
                Ok(s) => s,
                Err(_) => continue,
            };
            if let Some(hash) = key_str.rsplit(':').next() {
                let session_key = keys::session_key(hash);
                if let Some(raw) = self.sessions.get(session_key.as_bytes())? {
                    if let Ok(session) = Self::deserialize::<Session>(&raw) {
                        sessions.push((hash.to_string(), session.created_at));
                    }
                }
            }
        }

        if sessions.len() <= max_sessions {
            return Ok(());
        }

        // 最旧的在前
        sessions.sort_by_key(|(_, created_at)| *created_at);

        let to_remove = sessions.len() - max_sessions;
        for (hash, _) in sessions.into_iter().take(to_remove) {
            self.delete_session(&hash)?;
        }

        Ok(())
    }

    /// 清理过期/已撤销会话，每批最多处理 1000 条，避免长时间阻塞。
    /// 返回本批次实际删除的会话数。
    pub fn cleanup_expired_sessions(&self) -> Result<u32, StoreError> {
        const MAX_BATCH_SIZE: usize = 1000;

        let mut expired = Vec::new();
        for item in self.sessions.iter() {
            let (k, v) = item?;
            let key_str = String::from_utf8_lossy(&k);
            // user index entries carry empty values and a "user:" prefix
            if key_str.starts_with("user:") {
                continue;
            }
            let session: Session = Self::deserialize(&v)?;
            if session.expires_at <= Utc::now() || session.revoked {
                expired.push(session.token_hash);
                if expired.len() >= MAX_BATCH_SIZE {
                    break;
                }
            }
        }

        let count = expired.len() as u32;
        for hash in expired {
            self.delete_session(&hash)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = Store::open(tmp.path().join("sessions.sled").to_str().unwrap()).unwrap();
        (tmp, store)
    }

    fn session(hash: &str, user: &str, expires_in_hours: i64) -> Session {
        Session {
            token_hash: hash.to_string(),
            user_id: user.to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::hours(expires_in_hours),
            revoked: false,
        }
    }

    #[test]
    fn create_get_delete_roundtrip() {
        let (_tmp, store) = temp_store();
        store.create_session(&session("h1", "u1", 1)).unwrap();
        assert!(store.get_session("h1").unwrap().is_some());
        store.delete_session("h1").unwrap();
        assert!(store.get_session("h1").unwrap().is_none());
    }

    #[test]
    fn expired_session_reads_as_none() {
        let (_tmp, store) = temp_store();
        store.create_session(&session("h1", "u1", -1)).unwrap();
        assert!(store.get_session("h1").unwrap().is_none());
    }

    #[test]
    fn cleanup_removes_only_expired() {
        let (_tmp, store) = temp_store();
        store.create_session(&session("h1", "u1", -1)).unwrap();
        store.create_session(&session("h2", "u1", 1)).unwrap();

        let removed = store.cleanup_expired_sessions().unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_session("h2").unwrap().is_some());
    }

    #[test]
    fn session_cap_removes_oldest() {
        let (_tmp, store) = temp_store();
        let mut old = session("h-old", "u1", 1);
        old.created_at = Utc::now() - Duration::hours(5);
        store.create_session(&old).unwrap();
        store.create_session(&session("h-new", "u1", 1)).unwrap();

        store.cleanup_oldest_user_sessions("u1", 1).unwrap();
        assert!(store.get_session("h-old").unwrap().is_none());
        assert!(store.get_session("h-new").unwrap().is_some());
    }
}
