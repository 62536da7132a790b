//! # LRU (Least Recently Used) Cache Implementation
//!
//! A capacity-bounded map that evicts the least recently used entry when a new
//! key is inserted into a full cache. Lookups, inserts, promotions and evictions
//! are all O(1).
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                           LRUCache<K, V>                                 │
//!   │                                                                          │
//!   │   index: HashMap<K, usize>          key → arena slot                     │
//!   │                                                                          │
//!   │   nodes: Vec<Node<K, V>>            arena, slots 0 and 1 are anchors     │
//!   │                                                                          │
//!   │   ┌──────┐   ┌──────┐   ┌──────┐   ┌──────┐   ┌──────┐                   │
//!   │   │ HEAD │ ⇄ │  k3  │ ⇄ │  k1  │ ⇄ │  k2  │ ⇄ │ TAIL │                   │
//!   │   │ [0]  │   │ [4]  │   │ [2]  │   │ [3]  │   │ [1]  │                   │
//!   │   └──────┘   └──────┘   └──────┘   └──────┘   └──────┘                   │
//!   │              (MRU)                  (LRU)                                │
//!   │                                                                          │
//!   │   free: Vec<usize>                  recycled slots                       │
//!   │   capacity: usize                                                        │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Links are arena indices rather than pointers, so the list has no
//! reference cycles and needs no `unsafe`. A slot index stays valid until the
//! entry in it is removed; freed slots are reused before the arena grows, so
//! the arena never holds more than `capacity + 2` slots.
//!
//! ## Insert Flow
//!
//! ```text
//!   insert(key, value)
//!        │
//!        ├── key present      → replace value, move slot next to HEAD
//!        │
//!        ├── len < capacity   → allocate slot, link next to HEAD
//!        │
//!        └── len == capacity  → unlink TAIL.prev, drop it from the index,
//!                               then allocate and link next to HEAD
//! ```
//!
//! ## Core Operations
//!
//! | Method            | Complexity | Description                               |
//! |-------------------|------------|-------------------------------------------|
//! | `new(capacity)`   | O(1)       | Fails on zero capacity                    |
//! | `put(k, v)`       | O(1)       | Insert or update, may evict one entry     |
//! | `insert(k, v)`    | O(1)       | As `put`, returns the replaced value      |
//! | `get(&k)`         | O(1)       | Lookup and promote to most recent         |
//! | `peek(&k)`        | O(1)       | Lookup without promotion                  |
//! | `remove(&k)`      | O(1)       | Drop an entry                             |
//! | `pop_lru()`       | O(1)       | Remove the least recently used entry      |
//! | `recency_rank(&k)`| O(n)       | Position from the MRU end                 |
//! | `clear()`         | O(n)       | Drop everything, keep capacity            |
//!
//! ## Example Usage
//!
//! ```rust
//! use recache::cache::cache_traits::CoreCache;
//! use recache::cache::lru::LRUCache;
//!
//! let mut cache = LRUCache::new(2).unwrap();
//! cache.put(1, "one");
//! cache.put(2, "two");
//! assert_eq!(cache.get(&1), Some(&"one"));
//!
//! // Key 2 is now least recently used and makes room for key 3.
//! cache.put(3, "three");
//! assert_eq!(cache.get(&2), None);
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::mem;

use log::{debug, info, warn};

use crate::cache::cache_traits::{CacheStats, CoreCache, LRUCacheTrait, MutableCache};
use crate::common::config::{CacheConfig, MAX_PREALLOCATED_ENTRIES, SENTINEL_SLOTS};
use crate::common::exception::CacheError;

/// Arena slot of the most-recent anchor.
const HEAD: usize = 0;
/// Arena slot of the least-recent anchor.
const TAIL: usize = 1;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// One arena slot. Anchors and freed slots carry no entry.
#[derive(Debug)]
struct Node<K, V> {
    entry: Option<Entry<K, V>>,
    prev: usize,
    next: usize,
}

impl<K, V> Node<K, V> {
    fn anchor(prev: usize, next: usize) -> Self {
        Self {
            entry: None,
            prev,
            next,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counters {
    get_calls: u64,
    get_hits: u64,
    get_misses: u64,
    insert_calls: u64,
    insert_updates: u64,
    insert_new: u64,
    evictions: u64,
    removals: u64,
}

#[derive(Debug)]
struct LruMetrics {
    enabled: bool,
    counters: Counters,
}

impl LruMetrics {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            counters: Counters::default(),
        }
    }

    #[inline]
    fn record(&mut self, update: impl FnOnce(&mut Counters)) {
        if self.enabled {
            update(&mut self.counters);
        }
    }
}

/// Point-in-time copy of an [`LRUCache`]'s counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evictions: u64,
    pub removals: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

/// LRU (Least Recently Used) Cache.
///
/// See module-level documentation for details.
#[derive(Debug)]
pub struct LRUCache<K, V> {
    capacity: usize,
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    free: Vec<usize>,
    log_evictions: bool,
    metrics: LruMetrics,
}

impl<K, V> LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Returns [`CacheError::InvalidConfiguration`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        Self::with_config(&CacheConfig::with_capacity(capacity))
    }

    pub fn with_config(config: &CacheConfig) -> Result<Self, CacheError> {
        if let Err(e) = config.validate() {
            warn!("Rejected LRU cache configuration: {}", e);
            return Err(e);
        }

        info!(
            "Initializing LRUCache with capacity {} (stats: {})",
            config.capacity, config.enable_stats
        );

        let prealloc = config.capacity.min(MAX_PREALLOCATED_ENTRIES);
        let mut nodes = Vec::with_capacity(prealloc + SENTINEL_SLOTS);
        nodes.push(Node::anchor(HEAD, TAIL));
        nodes.push(Node::anchor(HEAD, TAIL));

        Ok(Self {
            capacity: config.capacity,
            index: HashMap::with_capacity(prealloc),
            nodes,
            free: Vec::new(),
            log_evictions: config.log_evictions,
            metrics: LruMetrics::new(config.enable_stats),
        })
    }

    /// Inserts or updates `key`, marking it most recently used.
    ///
    /// When the key is new and the cache is full, the least recently used entry
    /// is evicted first.
    pub fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    /// Returns the value for `key` without changing its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let &idx = self.index.get(key)?;
        self.value_at(idx)
    }

    /// Returns the most recently used entry.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.entry_at(self.nodes[HEAD].next)
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.nodes[HEAD].next,
            remaining: self.index.len(),
        }
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        let c = self.metrics.counters;
        LruMetricsSnapshot {
            get_calls: c.get_calls,
            get_hits: c.get_hits,
            get_misses: c.get_misses,
            insert_calls: c.insert_calls,
            insert_updates: c.insert_updates,
            insert_new: c.insert_new,
            evictions: c.evictions,
            removals: c.removals,
            cache_len: self.index.len(),
            capacity: self.capacity,
        }
    }

    fn value_at(&self, idx: usize) -> Option<&V> {
        self.nodes[idx].entry.as_ref().map(|e| &e.value)
    }

    fn entry_at(&self, idx: usize) -> Option<(&K, &V)> {
        self.nodes[idx].entry.as_ref().map(|e| (&e.key, &e.value))
    }

    /// Detaches `idx` from its neighbours. The slot's own links are left stale.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Links `idx` directly after the head anchor.
    fn attach_front(&mut self, idx: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[HEAD].next = idx;
    }

    fn promote(&mut self, idx: usize) {
        if self.nodes[HEAD].next == idx {
            return;
        }
        self.unlink(idx);
        self.attach_front(idx);
    }

    fn alloc(&mut self, entry: Entry<K, V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx].entry = Some(entry);
                idx
            }
            None => {
                self.nodes.push(Node {
                    entry: Some(entry),
                    prev: HEAD,
                    next: HEAD,
                });
                self.nodes.len() - 1
            }
        }
    }

    /// Unlinks and frees `idx`, returning its entry. The caller keeps the index in sync.
    fn release(&mut self, idx: usize) -> Option<Entry<K, V>> {
        self.unlink(idx);
        let entry = self.nodes[idx].entry.take();
        self.free.push(idx);
        entry
    }

    /// Removes the entry adjacent to the tail anchor from both structures.
    fn take_lru(&mut self) -> Option<(K, V)> {
        let idx = self.nodes[TAIL].prev;
        if idx == HEAD {
            return None;
        }
        let entry = self.release(idx)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn evict(&mut self) {
        if self.take_lru().is_some() {
            self.metrics.record(|c| c.evictions += 1);
            if self.log_evictions {
                debug!(
                    "Evicted least recently used entry (capacity {})",
                    self.capacity
                );
            }
        }
    }

    /// Verifies that the index and the recency list describe the same entries.
    #[cfg(test)]
    fn assert_consistent(&self) {
        assert!(self.index.len() <= self.capacity);

        let mut cursor = self.nodes[HEAD].next;
        let mut prev = HEAD;
        let mut seen = 0;
        while cursor != TAIL {
            assert_eq!(self.nodes[cursor].prev, prev, "broken back link at {}", cursor);
            let entry = self.nodes[cursor].entry.as_ref().expect("linked slot is empty");
            assert_eq!(self.index.get(&entry.key), Some(&cursor));
            seen += 1;
            prev = cursor;
            cursor = self.nodes[cursor].next;
        }
        assert_eq!(self.nodes[TAIL].prev, prev);
        assert_eq!(seen, self.index.len());
        assert_eq!(self.nodes.len(), SENTINEL_SLOTS + seen + self.free.len());
    }
}

impl<K, V> CoreCache<K, V> for LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.metrics.record(|c| c.insert_calls += 1);

        if let Some(&idx) = self.index.get(&key) {
            self.metrics.record(|c| c.insert_updates += 1);
            let previous = self.nodes[idx]
                .entry
                .as_mut()
                .map(|e| mem::replace(&mut e.value, value));
            self.promote(idx);
            return previous;
        }

        if self.index.len() >= self.capacity {
            self.evict();
        }

        self.metrics.record(|c| c.insert_new += 1);
        let idx = self.alloc(Entry {
            key: key.clone(),
            value,
        });
        self.attach_front(idx);
        self.index.insert(key, idx);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&idx) = self.index.get(key) else {
            self.metrics.record(|c| {
                c.get_calls += 1;
                c.get_misses += 1;
            });
            return None;
        };
        self.metrics.record(|c| {
            c.get_calls += 1;
            c.get_hits += 1;
        });
        self.promote(idx);
        self.value_at(idx)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        debug!("Clearing LRUCache with {} entries", self.index.len());
        self.index.clear();
        self.free.clear();
        self.nodes.truncate(SENTINEL_SLOTS);
        self.nodes[HEAD].next = TAIL;
        self.nodes[TAIL].prev = HEAD;
    }
}

impl<K, V> MutableCache<K, V> for LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        let entry = self.release(idx)?;
        self.metrics.record(|c| c.removals += 1);
        Some(entry.value)
    }
}

impl<K, V> LRUCacheTrait<K, V> for LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        let popped = self.take_lru();
        if popped.is_some() {
            self.metrics.record(|c| c.removals += 1);
        }
        popped
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        self.entry_at(self.nodes[TAIL].prev)
    }

    fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&idx) => {
                self.promote(idx);
                true
            }
            None => false,
        }
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        let &target = self.index.get(key)?;
        let mut cursor = self.nodes[HEAD].next;
        let mut rank = 0;
        while cursor != TAIL {
            if cursor == target {
                return Some(rank);
            }
            rank += 1;
            cursor = self.nodes[cursor].next;
        }
        None
    }
}

impl<K, V> CacheStats for LRUCache<K, V> {
    fn total_gets(&self) -> u64 {
        self.metrics.counters.get_calls
    }

    fn total_hits(&self) -> u64 {
        self.metrics.counters.get_hits
    }

    fn total_misses(&self) -> u64 {
        self.metrics.counters.get_misses
    }

    fn total_evictions(&self) -> u64 {
        self.metrics.counters.evictions
    }

    fn reset_stats(&mut self) {
        self.metrics.counters = Counters::default();
    }
}

/// Iterator over an [`LRUCache`] from most to least recently used.
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.cursor];
        let entry = node.entry.as_ref()?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
