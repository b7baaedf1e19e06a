//! Cache metrics.
//!
//! Counters are updated on the lookup hot path, so they are plain relaxed
//! atomics; [`CacheStats`] is the copyable snapshot handed to callers.
//!
//! The numbers are observational only. Under concurrent lookups two threads
//! may both miss on the same key and both insert it, in which case `misses`
//! and `insertions` count both.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of a `RuleSet`'s `find_all` cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to scan an arity bucket.
    pub misses: u64,
    /// Entries written (including overwrites after a race).
    pub insertions: u64,
    /// Entries dropped to make room.
    pub evictions: u64,
    /// Entries currently held.
    pub len: usize,
    /// Maximum number of entries; 0 when caching is disabled.
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, or 0 before any lookup.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }
}

#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    evictions: AtomicU64,
}

impl CacheCounters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn insertion(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, len: usize, capacity: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            len,
            capacity,
        }
    }
}
