//! Thread-safe LRU cache.
//!
//! `ConcurrentLRUCache` guards a single [`LRUCache`] with one `parking_lot::Mutex`.
//! The index and the recency list are always updated together, so every call
//! holds the lock for its whole duration and no other thread can observe a
//! half-applied promotion or eviction. Values are returned by clone because a
//! reference cannot outlive the guard.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use recache::cache::concurrent_lru::ConcurrentLRUCache;
//!
//! let cache = Arc::new(ConcurrentLRUCache::new(64).unwrap());
//!
//! let writer = Arc::clone(&cache);
//! thread::spawn(move || writer.put(1u64, vec![1u8, 2, 3]))
//!     .join()
//!     .unwrap();
//!
//! assert_eq!(cache.get(&1), Some(vec![1, 2, 3]));
//! ```

use std::hash::Hash;

use parking_lot::Mutex;

use crate::cache::cache_traits::{CacheStats, ConcurrentCache, CoreCache, LRUCacheTrait, MutableCache};
use crate::cache::lru::{LRUCache, LruMetricsSnapshot};
use crate::common::config::CacheConfig;
use crate::common::exception::CacheError;

#[derive(Debug)]
pub struct ConcurrentLRUCache<K, V> {
    inner: Mutex<LRUCache<K, V>>,
}

impl<K, V> ConcurrentLRUCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        Ok(Self::from_cache(LRUCache::new(capacity)?))
    }

    pub fn with_config(config: &CacheConfig) -> Result<Self, CacheError> {
        Ok(Self::from_cache(LRUCache::with_config(config)?))
    }

    pub fn from_cache(cache: LRUCache<K, V>) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// Looks up `key`, promoting it on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.inner.lock().pop_lru()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn hit_ratio(&self) -> f64 {
        self.inner.lock().hit_ratio()
    }

    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }

    /// Runs `f` with the lock held, so several operations apply as one.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LRUCache<K, V>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    pub fn into_inner(self) -> LRUCache<K, V> {
        self.inner.into_inner()
    }
}

impl<K: Send, V: Send> ConcurrentCache for ConcurrentLRUCache<K, V> {}
