use thiserror::Error;

/// Errors raised while building or configuring a cache.
///
/// A lookup miss is not an error; `get` reports it through `Option`.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid cache configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Failed to read cache config: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("Failed to parse cache config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl CacheError {
    pub fn zero_capacity() -> Self {
        CacheError::InvalidConfiguration("capacity must be greater than 0".to_string())
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, CacheError::InvalidConfiguration(_))
    }
}
