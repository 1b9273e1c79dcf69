use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::catalog::types::Problem;
use crate::services::codeforces::{CodeforcesClient, UpstreamError};

/// Observable fetch state, reported by the health endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum CatalogStatus {
    Pending,
    Ready { problems: usize },
    Failed { error: String },
}

enum Inner {
    Pending,
    Ready(Arc<Vec<Problem>>),
    Failed(String),
}

/// Fetch-once catalog holder.
///
/// The catalog is fetched lazily on first use and then shared as an immutable
/// `Arc` snapshot — an explicitly owned value passed into the filter
/// functions, never a mutable singleton. A failed fetch is remembered and
/// surfaced to the caller; the next request attempts a fresh fetch (there is
/// no background refresh or automatic retry).
pub struct CatalogCache {
    inner: RwLock<Inner>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::Pending),
        }
    }

    pub async fn status(&self) -> CatalogStatus {
        match &*self.inner.read().await {
            Inner::Pending => CatalogStatus::Pending,
            Inner::Ready(problems) => CatalogStatus::Ready {
                problems: problems.len(),
            },
            Inner::Failed(error) => CatalogStatus::Failed {
                error: error.clone(),
            },
        }
    }

    /// Current snapshot if one has been fetched, without triggering a fetch.
    pub async fn snapshot(&self) -> Option<Arc<Vec<Problem>>> {
        match &*self.inner.read().await {
            Inner::Ready(problems) => Some(problems.clone()),
            _ => None,
        }
    }

    /// Return the snapshot, fetching it first if this is the first use or the
    /// previous attempt failed. The write lock is held across the fetch so
    /// concurrent first requests collapse into one upstream call.
    pub async fn get_or_fetch(
        &self,
        client: &CodeforcesClient,
    ) -> Result<Arc<Vec<Problem>>, UpstreamError> {
        if let Inner::Ready(problems) = &*self.inner.read().await {
            return Ok(problems.clone());
        }

        let mut guard = self.inner.write().await;
        // Another request may have completed the fetch while we waited.
        if let Inner::Ready(problems) = &*guard {
            return Ok(problems.clone());
        }

        match client.problemset_problems().await {
            Ok(problems) => {
                tracing::info!(count = problems.len(), "Catalog fetched");
                let snapshot = Arc::new(problems);
                *guard = Inner::Ready(snapshot.clone());
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog fetch failed");
                *guard = Inner::Failed(e.to_string());
                Err(e)
            }
        }
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodeforcesConfig;

    fn mock_client() -> CodeforcesClient {
        CodeforcesClient::new(&CodeforcesConfig {
            api_url: "http://unused.invalid".to_string(),
            mock: true,
            timeout_secs: 1,
        })
    }

    #[tokio::test]
    async fn starts_pending() {
        let cache = CatalogCache::new();
        assert!(matches!(cache.status().await, CatalogStatus::Pending));
        assert!(cache.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn fetches_once_and_shares_the_snapshot() {
        let cache = CatalogCache::new();
        let client = mock_client();

        let first = cache.get_or_fetch(&client).await.unwrap();
        assert!(!first.is_empty());

        let second = cache.get_or_fetch(&client).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(matches!(
            cache.status().await,
            CatalogStatus::Ready { .. }
        ));
    }

    #[tokio::test]
    async fn failed_fetch_is_observable_and_retried_on_next_request() {
        let cache = CatalogCache::new();
        // Unreachable loopback port: transport failure without real network.
        let broken = CodeforcesClient::new(&CodeforcesConfig {
            api_url: "http://127.0.0.1:1".to_string(),
            mock: false,
            timeout_secs: 1,
        });

        assert!(cache.get_or_fetch(&broken).await.is_err());
        assert!(matches!(
            cache.status().await,
            CatalogStatus::Failed { .. }
        ));

        // A later request with a working client recovers.
        let working = mock_client();
        assert!(cache.get_or_fetch(&working).await.is_ok());
        assert!(matches!(
            cache.status().await,
            CatalogStatus::Ready { .. }
        ));
    }
}
