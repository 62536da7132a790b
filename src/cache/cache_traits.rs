//! # Cache Trait Hierarchy
//!
//! Interfaces shared by the cache implementations in this crate. Operations are
//! split by what they require of the eviction policy, so a caller that only needs
//! lookups and inserts can be generic over `CoreCache` alone.
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&, &K) → bool                 │
//!   │  len / is_empty / capacity / clear      │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          MutableCache<K, V>             │
//!   │                                         │
//!   │  remove(&K) → Option<V>                 │
//!   │  remove_batch(&[K])                     │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          LRUCacheTrait<K, V>            │
//!   │                                         │
//!   │  pop_lru() → (K, V)                     │
//!   │  peek_lru() → (&K, &V)                  │
//!   │  touch(&K) → bool                       │
//!   │  recency_rank(&K) → Option<usize>       │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! ## Utility Traits
//!
//! | Trait             | Purpose                                   |
//! |-------------------|-------------------------------------------|
//! | `ConcurrentCache` | Marker for caches safe to share (`Send + Sync`) |
//! | `CacheStats`      | Hit ratio and counters                    |
//!
//! ## Thread Safety
//!
//! - Implementations of `CoreCache` take `&mut self` and are **NOT** thread-safe
//! - `ConcurrentLRUCache` wraps an `LRUCache` in a single lock and implements
//!   `ConcurrentCache`

use crate::common::config::PRESSURE_THRESHOLD;

/// Core cache operations that all caches support.
pub trait CoreCache<K, V> {
    /// Insert a key-value pair, returning the previous value if it existed
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Get a value by key (may update internal state for access tracking)
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Check if a key exists without updating access state
    fn contains(&self, key: &K) -> bool;

    /// Get the current number of entries
    fn len(&self) -> usize;

    /// Check if the cache is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the maximum capacity
    fn capacity(&self) -> usize;

    /// Remove all entries
    fn clear(&mut self);

    /// True once the fill ratio passes [`PRESSURE_THRESHOLD`].
    fn is_under_pressure(&self) -> bool {
        self.capacity() > 0 && self.len() as f64 / self.capacity() as f64 > PRESSURE_THRESHOLD
    }
}

/// Caches that support arbitrary key-based removal
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Remove a specific key-value pair
    /// Returns the removed value if the key existed
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Remove multiple keys
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// LRU-specific operations that respect access order
pub trait LRUCacheTrait<K, V>: MutableCache<K, V> {
    /// Remove and return the least recently used entry
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Peek at the LRU entry without removing it
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Touch an entry to mark it as recently used without retrieving the value
    /// Returns true if the key was found and touched
    fn touch(&mut self, key: &K) -> bool;

    /// Get the recency rank of a key (0 = most recent, higher = less recent)
    /// Returns None if key not found
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Marker trait for caches that are safe to use concurrently
pub trait ConcurrentCache: Send + Sync {}

/// Statistics and monitoring capabilities
pub trait CacheStats {
    /// Cache hit ratio (0.0 to 1.0)
    fn hit_ratio(&self) -> f64 {
        let gets = self.total_gets();
        if gets == 0 {
            0.0
        } else {
            self.total_hits() as f64 / gets as f64
        }
    }

    /// Total number of get operations
    fn total_gets(&self) -> u64;

    /// Total number of cache hits
    fn total_hits(&self) -> u64;

    /// Total number of cache misses
    fn total_misses(&self) -> u64 {
        self.total_gets() - self.total_hits()
    }

    /// Total number of evictions
    fn total_evictions(&self) -> u64;

    /// Reset all statistics
    fn reset_stats(&mut self);
}
