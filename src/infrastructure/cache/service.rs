//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during cache operations.
///
/// Distinct from a miss: a miss is `Ok(None)` from [`CacheService::get`].
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
            CacheError::ConnectionError(e.to_string())
        } else {
            CacheError::OperationError(e.to_string())
        }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value accelerator with per-key TTL.
///
/// The cache is never authoritative. Callers treat both `Ok(None)` and
/// `Err(_)` from [`Self::get`] as "ask the store", and never fail an
/// operation because a cache write failed.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Reads a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on hit
    /// - `Ok(None)` on miss
    /// - `Err(_)` when the backend failed
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value with an explicit TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Stores a value with the cache's configured default TTL.
    async fn set_default(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Removes a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Reports whether a key is currently cached.
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;
}
