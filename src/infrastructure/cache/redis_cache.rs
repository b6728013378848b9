//! Redis-backed cache implementation.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::time::Duration;
use tracing::debug;

/// Redis cache for short code lookups.
///
/// Uses a shared `ConnectionManager` for connection reuse and automatic
/// reconnection. Errors are returned to the caller, which decides to fall
/// back to the store.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    /// Wraps an established connection.
    ///
    /// `default_ttl` is applied by [`CacheService::set_default`]; it comes
    /// from the `CACHE_TTL_SECONDS` env var.
    pub fn new(client: ConnectionManager, default_ttl: Duration) -> Self {
        Self {
            client,
            default_ttl,
        }
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();
        let value: Option<String> = conn.get(key).await?;

        match &value {
            Some(_) => debug!("Cache HIT: {}", key),
            None => debug!("Cache MISS: {}", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        debug!("Cache SET: {} (TTL: {}s)", key, ttl_seconds);

        Ok(())
    }

    async fn set_default(&self, key: &str, value: &str) -> CacheResult<()> {
        self.set(key, value, self.default_ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let deleted: i64 = conn.del(key).await?;

        if deleted > 0 {
            debug!("Cache DELETE: {}", key);
        }

        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.client.clone();
        Ok(conn.exists(key).await?)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
