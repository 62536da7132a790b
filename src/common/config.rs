use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::exception::CacheError;

/// Capacity used when none is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Fill ratio above which a cache reports itself as under pressure.
pub const PRESSURE_THRESHOLD: f64 = 0.9;

/// Number of reserved arena slots (head and tail anchors).
pub const SENTINEL_SLOTS: usize = 2;

/// Upper bound on slots reserved up front; larger caches grow on demand.
pub const MAX_PREALLOCATED_ENTRIES: usize = 1 << 16;

/// Settings for building an [`LRUCache`](crate::cache::lru::LRUCache).
///
/// Can be loaded from a TOML file:
///
/// ```toml
/// capacity = 256
/// enable_stats = true
/// log_evictions = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    pub enable_stats: bool,
    pub log_evictions: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            enable_stats: true,
            log_evictions: false,
        }
    }
}

impl CacheConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CacheError> {
        let config: CacheConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CacheError> {
        if self.capacity == 0 {
            return Err(CacheError::zero_capacity());
        }
        Ok(())
    }
}
