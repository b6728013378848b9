//! Shared Redis connection setup.

use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use tracing::info;

/// Connects to Redis and validates the connection with a PING.
///
/// The returned `ConnectionManager` is cheap to clone and is shared by the
/// cache and the membership filter.
///
/// # Errors
///
/// Returns the Redis error if the URL is invalid, the connection cannot be
/// established, or the PING fails.
pub async fn connect(redis_url: &str) -> RedisResult<ConnectionManager> {
    let client = Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    let mut conn = manager.clone();
    conn.ping::<()>().await?;

    info!("Connected to Redis");
    Ok(manager)
}
