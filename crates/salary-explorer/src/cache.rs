//! Memoization cache for pipeline stages.
//!
//! Provides an LRU cache with TTL expiration keyed by canonical stage inputs.
//! A poisoned lock is treated as an unavailable cache: lookups miss and
//! stores are dropped, so callers fall back to recomputation.

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::config::CacheConfig;

/// A memoized value with expiration tracking.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Bounded LRU cache with TTL expiration.
///
/// - **LRU eviction**: when full, the least recently used entry is evicted.
/// - **TTL expiration**: entries older than the configured TTL are never returned.
/// - **Degradation**: if the lock is poisoned, every lookup is a miss.
///
/// Values are cloned out on a hit, so store cheaply clonable values
/// (typically `Arc<T>`); a hit then hands back the very same allocation.
///
/// # Example
///
/// ```
/// use salary_explorer::MemoCache;
/// use std::time::Duration;
///
/// let cache: MemoCache<String, u32> = MemoCache::with_capacity(16, Duration::from_secs(300));
///
/// let (value, hit) = cache.get_or_insert_with("answer".to_string(), || 42);
/// assert_eq!((value, hit), (42, false));
///
/// let (value, hit) = cache.get_or_insert_with("answer".to_string(), || unreachable!());
/// assert_eq!((value, hit), (42, true));
/// ```
pub struct MemoCache<K, V> {
    inner: Mutex<LruCache<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K: Hash + Eq + Clone, V: Clone> MemoCache<K, V> {
    /// Creates a cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_capacity(config.max_entries, config.ttl)
    }

    /// Creates a cache with custom capacity and TTL.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Gets a cached value, promoting it to most-recently-used.
    ///
    /// Returns `None` if the key is absent, the entry has expired (it is
    /// removed), or the cache is unavailable.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.lock().ok()?;

        if let Some(entry) = cache.get(key) {
            if entry.is_expired(self.ttl) {
                cache.pop(key);
                return None;
            }
            return Some(entry.value.clone());
        }

        None
    }

    /// Stores a value, evicting the least recently used entry if full.
    pub fn insert(&self, key: K, value: V) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(key, CacheEntry::new(value));
        }
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    ///
    /// The second element is `true` on a cache hit. The computation runs
    /// outside the lock; two racing misses on one key store equal values.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> (V, bool)
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return (value, true);
        }

        let value = compute();
        self.insert(key, value.clone());
        (value, false)
    }

    /// Checks whether a key is present, without touching LRU order or expiry.
    pub fn contains(&self, key: &K) -> bool {
        match self.inner.lock() {
            Ok(cache) => cache.contains(key),
            Err(_) => false,
        }
    }

    /// Number of entries, possibly including expired ones not yet removed.
    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(cache) => cache.len(),
            Err(_) => 0,
        }
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all entries.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.clear();
        }
    }

    /// Removes expired entries, returning how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let Ok(mut cache) = self.inner.lock() else {
            return 0;
        };
        let ttl = self.ttl;
        let expired: Vec<K> = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            cache.pop(key);
        }
        expired.len()
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns cache occupancy statistics.
    pub fn stats(&self) -> CacheStats {
        match self.inner.lock() {
            Ok(cache) => {
                let total = cache.len();
                let expired = cache
                    .iter()
                    .filter(|(_, entry)| entry.is_expired(self.ttl))
                    .count();

                CacheStats {
                    total_entries: total,
                    expired_entries: expired,
                    valid_entries: total.saturating_sub(expired),
                }
            }
            Err(_) => CacheStats::default(),
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone> fmt::Debug for MemoCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("MemoCache")
            .field("entries", &stats.total_entries)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Occupancy statistics of a [`MemoCache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    /// Total number of entries.
    pub total_entries: usize,
    /// Expired entries not yet removed.
    pub expired_entries: usize,
    /// Non-expired entries.
    pub valid_entries: usize,
}

/// Hit/miss counters of a memoized pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageStats {
    /// Lookups answered from the cache.
    pub cache_hits: usize,
    /// Lookups that had to compute.
    pub cache_misses: usize,
}

impl StageStats {
    /// Total lookups.
    pub fn lookups(&self) -> usize {
        self.cache_hits + self.cache_misses
    }

    /// Cache hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / total as f64) * 100.0
        }
    }

    pub(crate) fn record(&mut self, hit: bool) {
        if hit {
            self.cache_hits += 1;
        } else {
            self.cache_misses += 1;
        }
    }
}

impl fmt::Display for StageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits / {} misses ({:.1}%)",
            self.cache_hits,
            self.cache_misses,
            self.hit_rate()
        )
    }
}
