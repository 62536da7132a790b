// ==============================================
// LRU CONCURRENCY TESTS (integration)
// ==============================================

use std::sync::{Arc, Barrier};
use std::thread;

use recache::{ConcurrentLRUCache, CoreCache};

use crate::assert_ok;
use crate::common::logger::init_test_logger;

mod thread_safety {
    use super::*;

    #[test]
    fn test_concurrent_insert_operations() {
        init_test_logger();
        let cache = Arc::new(assert_ok!(ConcurrentLRUCache::new(1_000)));
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..250u32 {
                        cache.put(t * 250 + i, format!("value_{}", t * 250 + i));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 1_000);
        for key in 0..1_000u32 {
            assert_eq!(cache.peek(&key), Some(format!("value_{}", key)));
        }
    }

    #[test]
    fn test_concurrent_mixed_operations() {
        init_test_logger();
        let cache = Arc::new(assert_ok!(ConcurrentLRUCache::new(32)));
        let handles: Vec<_> = (0..6u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let mut rng = fastrand::Rng::with_seed(t);
                    for _ in 0..2_000 {
                        let key = rng.u64(0..64);
                        match rng.u8(0..4) {
                            0 | 1 => cache.put(key, key * 2),
                            2 => {
                                if let Some(value) = cache.get(&key) {
                                    assert_eq!(value, key * 2);
                                }
                            }
                            _ => {
                                cache.remove(&key);
                            }
                        }
                        assert!(cache.len() <= 32);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Index and recency list still agree after contention.
        cache.with_lock(|inner| {
            assert_eq!(inner.keys().count(), inner.len());
            for (key, value) in inner.iter() {
                assert!(inner.contains(key));
                assert_eq!(*value, key * 2);
            }
        });
    }
}

mod stress_testing {
    use super::*;

    #[test]
    fn test_hot_key_survives_cold_scan() {
        let cache = Arc::new(assert_ok!(ConcurrentLRUCache::new(8)));
        cache.put(u64::MAX, 0u64);

        let scanner = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for key in 0..10_000u64 {
                    cache.with_lock(|inner| {
                        inner.put(key, key);
                        inner.get(&u64::MAX);
                    });
                }
            })
        };
        scanner.join().unwrap();

        assert!(cache.contains(&u64::MAX));
        assert_eq!(cache.len(), 8);
        let snapshot = cache.metrics_snapshot();
        assert_eq!(snapshot.evictions, 10_001 - 8);
    }
}
