//! Bounded in-process key/value caches with least-recently-used eviction.
//!
//! - [`cache::lru::LRUCache`]: single-threaded cache, O(1) `get`/`put`
//! - [`cache::concurrent_lru::ConcurrentLRUCache`]: the same cache behind one lock
//! - [`common::config::CacheConfig`]: capacity and stats settings, loadable from TOML

pub mod cache;
pub mod common;

pub use cache::cache_traits::{CacheStats, ConcurrentCache, CoreCache, LRUCacheTrait, MutableCache};
pub use cache::concurrent_lru::ConcurrentLRUCache;
pub use cache::lru::{LRUCache, LruMetricsSnapshot};
pub use common::config::CacheConfig;
pub use common::exception::CacheError;
