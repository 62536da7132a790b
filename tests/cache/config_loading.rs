use std::io::Write;

use recache::common::config::DEFAULT_CACHE_CAPACITY;
use recache::{CacheConfig, CacheError, CacheStats, CoreCache, LRUCache};
use tempfile::NamedTempFile;

use crate::assert_ok;
use crate::common::logger::init_test_logger;

#[test]
fn test_cache_from_toml_file() {
    init_test_logger();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "capacity = 3").unwrap();
    writeln!(file, "log_evictions = true").unwrap();

    let config = assert_ok!(CacheConfig::load(file.path()));
    let mut cache = assert_ok!(LRUCache::with_config(&config));
    for i in 0..5 {
        cache.put(i, i);
    }

    assert_eq!(cache.capacity(), 3);
    assert_eq!(cache.total_evictions(), 2);
}

#[test]
fn test_zero_capacity_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "capacity = 0").unwrap();

    match CacheConfig::load(file.path()) {
        Err(CacheError::InvalidConfiguration(_)) => {}
        other => panic!("expected InvalidConfiguration, got {:?}", other),
    }
}

#[test]
fn test_default_config_builds_cache() {
    let cache: LRUCache<String, Vec<u8>> = assert_ok!(LRUCache::with_config(&CacheConfig::default()));
    assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
    assert!(cache.is_empty());
}
