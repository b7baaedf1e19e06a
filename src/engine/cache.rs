//! Bounded match cache for `find_all`.
//!
//! Maps a window's lookup key (see `key.rs`) to the ids of the rules that
//! matched it. Capacity is fixed at construction; when full, a victim is chosen
//! with the CLOCK (second-chance) policy, an approximation of LRU:
//!
//! ```text
//!  slots:   [k0 *] [k1  ] [k2 *] [k3  ]      * = referenced since last sweep
//!             ^hand
//!  insert k4: k0 is referenced -> clear bit, advance
//!             k1 is not        -> evict k1, store k4 there, advance
//! ```
//!
//! ## Concurrency
//!
//! Hits take the shared lock and set the referenced bit atomically, so
//! concurrent readers never serialize on each other. Inserts take the exclusive
//! lock. Two threads that miss on the same key both compute and both insert;
//! the values are equal, so the second insert is a harmless overwrite.
//!
//! A poisoned lock is recovered: the table is consistent after every
//! statement that can panic, and entries are immutable values.

use super::metrics::{CacheCounters, CacheStats};
use super::ruleset::RuleId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub(crate) type CachedMatches = Arc<[RuleId]>;

#[derive(Debug)]
struct Slot {
    key: String,
    value: CachedMatches,
    referenced: AtomicBool,
}

#[derive(Debug, Default)]
struct ClockTable {
    index: HashMap<String, usize>,
    slots: Vec<Slot>,
    hand: usize,
}

#[derive(Debug)]
pub(crate) struct MatchCache {
    capacity: usize,
    table: RwLock<ClockTable>,
    counters: CacheCounters,
}

impl MatchCache {
    /// `capacity` must be non-zero; a disabled cache is represented by not
    /// having a `MatchCache` at all.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        MatchCache { capacity, table: RwLock::new(ClockTable::default()), counters: CacheCounters::default() }
    }

    pub(crate) fn get(&self, key: &str) -> Option<CachedMatches> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        match table.index.get(key) {
            Some(&slot_idx) => {
                let slot = &table.slots[slot_idx];
                slot.referenced.store(true, Ordering::Relaxed);
                self.counters.hit();
                tracing::trace!(key = %key.escape_debug(), matches = slot.value.len(), "match cache hit");
                Some(Arc::clone(&slot.value))
            }
            None => {
                self.counters.miss();
                tracing::trace!(key = %key.escape_debug(), "match cache miss");
                None
            }
        }
    }

    pub(crate) fn insert(&self, key: String, value: CachedMatches) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        self.counters.insertion();

        if let Some(&slot_idx) = table.index.get(&key) {
            let slot = &mut table.slots[slot_idx];
            slot.value = value;
            *slot.referenced.get_mut() = true;
            return;
        }

        if table.slots.len() < self.capacity {
            let slot_idx = table.slots.len();
            table.slots.push(Slot { key: key.clone(), value, referenced: AtomicBool::new(false) });
            table.index.insert(key, slot_idx);
            return;
        }

        let victim = table.advance_to_victim();
        let evicted = std::mem::replace(
            &mut table.slots[victim],
            Slot { key: key.clone(), value, referenced: AtomicBool::new(false) },
        );
        table.index.remove(&evicted.key);
        table.index.insert(key, victim);
        self.counters.eviction();
        tracing::trace!(evicted = %evicted.key.escape_debug(), "match cache eviction");
    }

    pub(crate) fn clear(&self) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        *table = ClockTable::default();
    }

    pub(crate) fn len(&self) -> usize {
        self.table.read().unwrap_or_else(PoisonError::into_inner).slots.len()
    }

    pub(crate) fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len(), self.capacity)
    }
}

impl ClockTable {
    /// Sweep from the hand, clearing referenced bits, and return the first
    /// unreferenced slot. The hand ends up just past the victim.
    ///
    /// Terminates within two sweeps: the first clears every bit it passes.
    fn advance_to_victim(&mut self) -> usize {
        let len = self.slots.len();
        loop {
            let idx = self.hand;
            self.hand = (self.hand + 1) % len;
            let referenced = self.slots[idx].referenced.get_mut();
            if *referenced {
                *referenced = false;
            } else {
                return idx;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[RuleId]) -> CachedMatches {
        Arc::from(v)
    }

    #[test]
    fn stores_and_returns_entries() {
        let cache = MatchCache::new(4);
        assert!(cache.get("a").is_none());

        cache.insert("a".to_string(), ids(&[0, 2]));
        assert_eq!(cache.get("a").as_deref(), Some(&[0, 2][..]));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.len, 1);
        assert_eq!(stats.capacity, 4);
    }

    #[test]
    fn empty_results_are_cached() {
        let cache = MatchCache::new(2);
        cache.insert("none".to_string(), ids(&[]));
        assert_eq!(cache.get("none").map(|v| v.len()), Some(0));
    }

    #[test]
    fn never_exceeds_capacity() {
        let cache = MatchCache::new(3);
        for i in 0..10 {
            cache.insert(format!("k{i}"), ids(&[i]));
        }
        let stats = cache.stats();
        assert_eq!(stats.len, 3);
        assert_eq!(stats.evictions, 7);
    }

    #[test]
    fn recently_read_entries_get_a_second_chance() {
        let cache = MatchCache::new(2);
        cache.insert("hot".to_string(), ids(&[0]));
        cache.insert("cold".to_string(), ids(&[1]));

        assert!(cache.get("hot").is_some());
        cache.insert("new".to_string(), ids(&[2]));

        assert!(cache.get("hot").is_some());
        assert!(cache.get("cold").is_none());
        assert!(cache.get("new").is_some());
    }

    #[test]
    fn reinsert_overwrites_without_growing() {
        let cache = MatchCache::new(2);
        cache.insert("k".to_string(), ids(&[0]));
        cache.insert("k".to_string(), ids(&[0]));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn clear_drops_entries_but_keeps_counters() {
        let cache = MatchCache::new(2);
        cache.insert("k".to_string(), ids(&[0]));
        cache.get("k");
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.get("k").is_none());
        assert_eq!(cache.stats().hits, 1);
    }
}
