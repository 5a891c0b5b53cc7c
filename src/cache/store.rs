use anyhow::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::types::{CacheEntry, CacheStats};

/// The cache seam the orchestrator consumes.
///
/// The built-in `CacheStore` is in-process and infallible; an externalized
/// store (e.g. a shared row store) can be injected instead, and its errors
/// degrade the orchestrator to always-miss rather than failing requests.
pub trait ResultCache<V>: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<V>>;
    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()>;
    fn delete(&self, key: &str) -> Result<bool>;
    fn stats(&self) -> Result<CacheStats>;
}

/// In-memory TTL+LRU cache with hit/miss statistics.
///
/// Expiry is checked lazily on `get`; when an insert would exceed
/// `max_entries`, the least-recently-accessed entry is evicted regardless
/// of its remaining TTL. Whichever bound triggers first wins.
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: Mutex<CacheInner<V>>,
    max_entries: usize,
}

#[derive(Debug)]
struct CacheInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V: Clone> CacheStore<V> {
    pub fn new(max_entries: usize) -> Self {
        assert!(max_entries > 0, "cache capacity must be non-zero");
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            max_entries,
        }
    }

    /// Look up a key. Expired entries are removed and count as misses.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        let expired = matches!(inner.entries.get(key), Some(entry) if entry.is_expired(now));
        if expired {
            inner.entries.remove(key);
            inner.misses += 1;
            return None;
        }

        if let Some(entry) = inner.entries.get_mut(key) {
            entry.touch(now);
            let value = entry.value.clone();
            inner.hits += 1;
            Some(value)
        } else {
            inner.misses += 1;
            None
        }
    }

    /// Insert or replace a key, evicting the LRU entry at capacity.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let mut inner = self.inner.lock();
        if !inner.entries.contains_key(key) && inner.entries.len() >= self.max_entries {
            if let Some(victim) = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_accessed_at)
                .map(|(k, _)| k.clone())
            {
                inner.entries.remove(&victim);
                inner.evictions += 1;
                debug!(key = %victim, "evicted least-recently-used cache entry");
            }
        }
        inner.entries.insert(key.to_string(), CacheEntry::new(value, ttl));
    }

    /// Remove a key. Returns whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().entries.remove(key).is_some()
    }

    /// Drop every expired entry. Returns how many were removed.
    ///
    /// Lazy expiry on `get` already guarantees correctness; sweeping only
    /// bounds memory held by keys nobody asks for again.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(now));
        before - inner.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            size: inner.entries.len(),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> CacheStore<V> {
    /// Start a background task that periodically purges expired entries.
    ///
    /// The task holds only a weak reference and exits once the store is
    /// dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let store = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // the first tick fires immediately
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                let purged = store.purge_expired();
                if purged > 0 {
                    debug!(purged, "swept expired cache entries");
                }
            }
        })
    }
}

impl<V: Clone + Send + Sync> ResultCache<V> for CacheStore<V> {
    fn get(&self, key: &str) -> Result<Option<V>> {
        Ok(CacheStore::get(self, key))
    }

    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        CacheStore::set(self, key, value, ttl);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(CacheStore::delete(self, key))
    }

    fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStore::stats(self))
    }
}
