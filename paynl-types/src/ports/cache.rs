//! Cache store port.
//!
//! Values are JSON strings so that any key-value backend can hold them.

use std::future::Future;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::CacheError;

/// A key-value store with per-entry expiry.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Returns the value for `key`, or `None` when missing or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key` for `ttl`.
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key`.
    async fn forget(&self, key: &str) -> Result<(), CacheError>;
}

/// Returns the cached value for `key`, or computes, stores and returns it.
///
/// Cache failures never fail the call: a broken read falls through to
/// `compute`, a broken write is logged and the fresh value returned. Errors
/// from `compute` are returned as-is and nothing is stored.
pub async fn remember<S, T, E, F, Fut>(
    store: &S,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<T, E>
where
    S: CacheStore + ?Sized,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match store.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding undecodable cache entry")
            }
        },
        Ok(None) => {}
        Err(e) => tracing::warn!(key, error = %e, "Cache read failed, computing value"),
    }

    let value = compute().await?;

    match serde_json::to_string(&value) {
        Ok(raw) => {
            if let Err(e) = store.put(key, raw, ttl).await {
                tracing::warn!(key, error = %e, "Cache write failed");
            }
        }
        Err(e) => tracing::warn!(key, error = %e, "Value not cacheable"),
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MapStore {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait::async_trait]
    impl CacheStore for MapStore {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, key: &str, value: String, _ttl: Duration) -> Result<(), CacheError> {
            self.entries.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn forget(&self, key: &str) -> Result<(), CacheError> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }

        async fn put(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }

        async fn forget(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }
    }

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_remember_computes_once() {
        let store = MapStore::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Result<Vec<u32>, String> = remember(&store, "k", TTL, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1, 2, 3])
            })
            .await;
            assert_eq!(value.unwrap(), vec![1, 2, 3]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remember_does_not_store_errors() {
        let store = MapStore::default();

        let first: Result<u32, String> =
            remember(&store, "k", TTL, || async { Err("boom".to_string()) }).await;
        assert_eq!(first, Err("boom".to_string()));
        assert!(store.get("k").await.unwrap().is_none());

        let second: Result<u32, String> = remember(&store, "k", TTL, || async { Ok(7) }).await;
        assert_eq!(second, Ok(7));
    }

    #[tokio::test]
    async fn test_remember_recomputes_undecodable_entry() {
        let store = MapStore::default();
        store.put("k", "not json".into(), TTL).await.unwrap();

        let value: Result<u32, String> = remember(&store, "k", TTL, || async { Ok(5) }).await;
        assert_eq!(value, Ok(5));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_remember_survives_broken_backend() {
        let value: Result<u32, String> =
            remember(&BrokenStore, "k", TTL, || async { Ok(9) }).await;
        assert_eq!(value, Ok(9));
    }
}
