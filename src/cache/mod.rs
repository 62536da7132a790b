pub mod cache_traits;
pub mod concurrent_lru;
pub mod lru;
