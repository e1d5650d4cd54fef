//! Time-boxed memoization for upstream responses.
//!
//! One cache instance is owned by the component that needs it (no
//! module-level singletons); TTL is supplied per call so logically
//! different endpoints can age out independently. Expired entries are
//! evicted lazily on the next lookup; there is no background sweep.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::SentinelError;

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self) -> bool {
        self.inserted_at.elapsed() < self.ttl
    }
}

pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if fresh, otherwise await
    /// `fetch`, store its result under `key`, and return it.
    ///
    /// A failed fetch caches nothing (no negative caching); the next call
    /// retries the upstream. Concurrent misses on the same key may each
    /// run `fetch`; last writer wins, which is acceptable because values
    /// are idempotent derivations of the same upstream state.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<V, SentinelError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, SentinelError>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                if entry.is_fresh() {
                    debug!("cache hit: {}", key);
                    return Ok(entry.value.clone());
                }
            }
        }

        // Evict the stale entry (if any) before going to the network, so a
        // failed fetch leaves no expired value behind.
        {
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get(key) {
                if !entry.is_fresh() {
                    entries.remove(key);
                    debug!("cache evict (expired): {}", key);
                }
            }
        }

        debug!("cache miss: {}", key);
        let value = fetch().await?;

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                inserted_at: Instant::now(),
                ttl,
            },
        );
        Ok(value)
    }

    /// Non-fetching read; returns the value only if present and fresh.
    pub async fn peek(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries.get(key).filter(|e| e.is_fresh()).map(|e| e.value.clone())
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn hit_within_ttl_skips_fetch() {
        let cache = TtlCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_fetch("k", Duration::from_secs(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42u32)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expiry_triggers_exactly_one_refetch() {
        let cache = TtlCache::new();
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("v".to_string())
        };

        cache
            .get_or_fetch("k", Duration::from_millis(20), fetch)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        cache
            .get_or_fetch("k", Duration::from_millis(20), fetch)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetch_caches_nothing() {
        let cache: TtlCache<u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_fetch("k", Duration::from_secs(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SentinelError::UpstreamUnavailable {
                    operation: "trending",
                    reason: "boom".into(),
                })
            })
            .await;
        assert!(first.is_err());
        assert!(cache.peek("k").await.is_none());

        // Next call retries the upstream instead of serving a failure.
        let second = cache
            .get_or_fetch("k", Duration::from_secs(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7u32)
            })
            .await
            .unwrap();
        assert_eq!(second, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_collide() {
        let cache = TtlCache::new();
        let ttl = Duration::from_secs(60);
        let a = cache
            .get_or_fetch("trending:sol:1h", ttl, || async { Ok(1u32) })
            .await
            .unwrap();
        let b = cache
            .get_or_fetch("trending:sol:6h", ttl, || async { Ok(2u32) })
            .await
            .unwrap();
        assert_eq!((a, b), (1, 2));
        assert_eq!(cache.peek("trending:sol:1h").await, Some(1));
        assert_eq!(cache.peek("trending:sol:6h").await, Some(2));
    }
}
