use std::time::{Duration, Instant};

/// A single cached value with its expiry and access bookkeeping
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: Instant,
    pub expires_at: Instant,
    pub last_accessed_at: Instant,
    pub hit_count: u64,
}

impl<V> CacheEntry<V> {
    /// Create an entry expiring `ttl` from now. `ttl` must be non-zero so
    /// that `expires_at > created_at` holds.
    pub fn new(value: V, ttl: Duration) -> Self {
        debug_assert!(ttl > Duration::ZERO, "cache entries require a non-zero ttl");
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl,
            last_accessed_at: now,
            hit_count: 0,
        }
    }

    /// An entry is logically absent once its expiry has passed
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Record a read for LRU tracking
    pub fn touch(&mut self, now: Instant) {
        self.last_accessed_at = now;
        self.hit_count += 1;
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
}

impl CacheStats {
    /// Hit rate as a percentage of all lookups
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64 * 100.0
    }
}
