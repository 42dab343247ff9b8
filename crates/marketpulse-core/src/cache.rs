//! In-memory TTL cache for derived upstream results.
//!
//! Entries are never evicted. Freshness is judged lazily by the reader
//! against a TTL, so a stale entry stays available as a fallback tier.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::InstrumentKey;

/// Reference freshness window shared by all keys.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// A cached payload and the instant it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub payload: V,
    pub fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// `now - fetched_at < ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Thread-safe keyed store shared across concurrent requests.
///
/// A `put` replaces the whole entry under the write lock, so readers never
/// observe a partially written payload.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Arc<tokio::sync::RwLock<HashMap<InstrumentKey, CacheEntry<V>>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
        }
    }

    /// Overwrite the entry for `key` unconditionally, stamped with the current time.
    pub async fn put(&self, key: InstrumentKey, payload: V) {
        self.put_with_timestamp(key, payload, Instant::now()).await;
    }

    /// Overwrite the entry for `key` with an explicit fetch instant.
    pub async fn put_with_timestamp(&self, key: InstrumentKey, payload: V, fetched_at: Instant) {
        let mut store = self.inner.write().await;
        store.insert(
            key,
            CacheEntry {
                payload,
                fetched_at,
            },
        );
    }

    /// Number of keys ever stored (stale entries included).
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn contains(&self, key: &InstrumentKey) -> bool {
        self.inner.read().await.contains_key(key)
    }
}

impl<V: Clone> TtlCache<V> {
    /// The entry for `key`, fresh or not.
    pub async fn get(&self, key: &InstrumentKey) -> Option<CacheEntry<V>> {
        let store = self.inner.read().await;
        store.get(key).cloned()
    }

    /// The payload for `key` only if its entry is younger than `ttl`.
    pub async fn get_fresh(&self, key: &InstrumentKey, ttl: Duration) -> Option<V> {
        let store = self.inner.read().await;
        store
            .get(key)
            .filter(|entry| entry.is_fresh(ttl))
            .map(|entry| entry.payload.clone())
    }
}
