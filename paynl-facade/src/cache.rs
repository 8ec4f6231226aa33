//! In-process cache with per-entry expiry.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use paynl_types::{CacheError, CacheStore};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// A [`CacheStore`] backed by a concurrent map.
///
/// Clones share the same entries. Expired entries are dropped when read.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<DashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, e| e.expires_at <= now);
        Ok(None)
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = InMemoryCache::new();
        cache
            .put("k", "v".into(), Duration::from_secs(10))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_forget() {
        let cache = InMemoryCache::new();
        cache
            .put("k", "v".into(), Duration::from_secs(10))
            .await
            .unwrap();
        cache.forget("k").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = InMemoryCache::new();
        let other = cache.clone();
        cache
            .put("k", "v".into(), Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(other.len(), 1);
    }
}
