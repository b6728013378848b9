//! RedisBloom-backed filter shared by every server process.

use super::service::{FilterInfo, FilterResult, MembershipFilter};
use async_trait::async_trait;
use redis::{AsyncCommands, RedisError, Value, aio::ConnectionManager};
use serde_json::json;
use tracing::{debug, info};

/// Bloom filter stored under a single Redis key via `BF.*` commands.
///
/// Requires the RedisBloom module on the server.
pub struct RedisBloomFilter {
    client: ConnectionManager,
    key: String,
    capacity: u64,
    error_rate: f64,
}

impl RedisBloomFilter {
    pub fn new(
        client: ConnectionManager,
        key: impl Into<String>,
        capacity: u64,
        error_rate: f64,
    ) -> Self {
        Self {
            client,
            key: key.into(),
            capacity,
            error_rate,
        }
    }
}

#[async_trait]
impl MembershipFilter for RedisBloomFilter {
    async fn initialize(&self) -> FilterResult<bool> {
        let mut conn = self.client.clone();

        let present: bool = conn.exists(&self.key).await?;
        if present {
            debug!("Bloom filter '{}' already exists", self.key);
            return Ok(false);
        }

        let reserved = redis::cmd("BF.RESERVE")
            .arg(&self.key)
            .arg(self.error_rate)
            .arg(self.capacity)
            .query_async::<()>(&mut conn)
            .await;

        match reserved {
            Ok(()) => {}
            Err(e) if is_already_reserved(&e) => {
                debug!("Bloom filter '{}' was reserved by another process", self.key);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            "Bloom filter '{}' reserved (capacity: {}, error rate: {})",
            self.key, self.capacity, self.error_rate
        );
        Ok(true)
    }

    async fn add(&self, item: &str) -> FilterResult<bool> {
        let mut conn = self.client.clone();
        let added = redis::cmd("BF.ADD")
            .arg(&self.key)
            .arg(item)
            .query_async::<bool>(&mut conn)
            .await?;
        Ok(added)
    }

    async fn add_many(&self, items: &[String]) -> FilterResult<Vec<bool>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.client.clone();
        let added = redis::cmd("BF.MADD")
            .arg(&self.key)
            .arg(items)
            .query_async::<Vec<bool>>(&mut conn)
            .await?;
        Ok(added)
    }

    async fn exists(&self, item: &str) -> FilterResult<bool> {
        let mut conn = self.client.clone();
        let present = redis::cmd("BF.EXISTS")
            .arg(&self.key)
            .arg(item)
            .query_async::<bool>(&mut conn)
            .await?;
        Ok(present)
    }

    async fn exists_many(&self, items: &[String]) -> FilterResult<Vec<bool>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.client.clone();
        let present = redis::cmd("BF.MEXISTS")
            .arg(&self.key)
            .arg(items)
            .query_async::<Vec<bool>>(&mut conn)
            .await?;
        Ok(present)
    }

    async fn info(&self) -> FilterResult<FilterInfo> {
        let mut conn = self.client.clone();
        let raw = redis::cmd("BF.INFO")
            .arg(&self.key)
            .query_async::<Value>(&mut conn)
            .await?;

        let mut info = parse_info(raw);
        info.insert("backend".into(), json!("redis"));
        info.insert("key".into(), json!(self.key));
        info.insert("error_rate".into(), json!(self.error_rate));

        let inserted = info.get("Number of items inserted").and_then(|v| v.as_f64());
        let capacity = info.get("Capacity").and_then(|v| v.as_f64());
        if let (Some(inserted), Some(capacity)) = (inserted, capacity)
            && capacity > 0.0
        {
            info.insert("fill_ratio".into(), json!(inserted / capacity));
        }

        Ok(info)
    }
}

/// `BF.RESERVE` answers `ERR item exists` when the key appeared after the
/// `EXISTS` check.
fn is_already_reserved(e: &RedisError) -> bool {
    e.to_string().to_ascii_lowercase().contains("item exists")
}

/// Flattens a `BF.INFO` reply (RESP2 name/value array or RESP3 map).
fn parse_info(raw: Value) -> FilterInfo {
    let pairs: Vec<(Value, Value)> = match raw {
        Value::Map(pairs) => pairs,
        Value::Array(items) => {
            let mut iter = items.into_iter();
            let mut pairs = Vec::new();
            while let (Some(name), Some(value)) = (iter.next(), iter.next()) {
                pairs.push((name, value));
            }
            pairs
        }
        _ => Vec::new(),
    };

    pairs
        .into_iter()
        .filter_map(|(name, value)| Some((value_to_string(&name)?, value_to_json(&value))))
        .collect()
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::SimpleString(s) => Some(s.clone()),
        _ => None,
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(n) => json!(n),
        Value::Double(n) => json!(n),
        Value::Boolean(b) => json!(b),
        Value::Nil => serde_json::Value::Null,
        other => value_to_string(other)
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
    }
}
