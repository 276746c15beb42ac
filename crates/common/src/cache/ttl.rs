//! Core TTL cache implementation

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Thread-safe cache whose entries expire `ttl` after insertion
///
/// Clones share storage and statistics.
pub struct TtlCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    entries: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
    metrics: MetricsCollector,
    clock: C,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Create a cache with a custom clock (useful for testing)
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            metrics: MetricsCollector::default(),
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry { value, inserted_at: self.clock.now() };
        self.entries.write().insert(key, entry);
        self.metrics.record_insert();
    }

    /// Insert several values under one write lock, all sharing the same
    /// insertion instant.
    pub fn insert_many<I>(&self, items: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        for (key, value) in items {
            entries.insert(key, CacheEntry { value, inserted_at: now });
            self.metrics.record_insert();
        }
    }

    /// Returns `None` if the key is absent or its entry has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => {
                    self.metrics.record_miss();
                    return None;
                }
                Some(entry) if now.duration_since(entry.inserted_at) < self.ttl => {
                    self.metrics.record_hit();
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Expired: drop it unless a fresh value raced in between the locks.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| now.duration_since(entry.inserted_at) >= self.ttl)
        {
            entries.remove(key);
            self.metrics.record_expiration();
        }
        self.metrics.record_miss();
        None
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().remove(key).map(|entry| entry.value)
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        self.entries.write().clear();
        self.metrics.record_invalidation();
    }

    /// Remove expired entries, returning how many were dropped
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
        let removed = before - entries.len();
        for _ in 0..removed {
            self.metrics.record_expiration();
        }
        removed
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len())
    }
}

impl<K, V, C> Clone for TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}
