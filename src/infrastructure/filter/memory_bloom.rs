//! In-process Bloom filter backend.

use super::service::{FilterError, FilterInfo, FilterResult, MembershipFilter};
use async_trait::async_trait;
use bloomfilter::Bloom;
use parking_lot::RwLock;
use serde_json::json;
use tracing::debug;

struct Inner {
    bloom: Bloom<str>,
    items: u64,
}

/// Bloom filter held in process memory.
///
/// Contents are lost on restart, so the server seeds it from the store at
/// startup. Each process has its own copy; the store's unique constraint
/// still arbitrates races between processes.
pub struct MemoryBloomFilter {
    capacity: usize,
    error_rate: f64,
    inner: RwLock<Option<Inner>>,
}

impl MemoryBloomFilter {
    /// Creates an uninitialized filter. Call [`MembershipFilter::initialize`] before use.
    pub fn new(capacity: usize, error_rate: f64) -> Self {
        Self {
            capacity,
            error_rate,
            inner: RwLock::new(None),
        }
    }
}

#[async_trait]
impl MembershipFilter for MemoryBloomFilter {
    async fn initialize(&self) -> FilterResult<bool> {
        let mut guard = self.inner.write();
        if guard.is_some() {
            return Ok(false);
        }

        if self.capacity == 0 || !(self.error_rate > 0.0 && self.error_rate < 1.0) {
            return Err(FilterError::InvalidParameters(format!(
                "capacity {} / error rate {}",
                self.capacity, self.error_rate
            )));
        }

        let bloom = Bloom::new_for_fp_rate(self.capacity, self.error_rate)
            .map_err(|e| FilterError::InvalidParameters(e.to_string()))?;
        *guard = Some(Inner { bloom, items: 0 });

        debug!(
            "Memory bloom filter created (capacity: {}, error rate: {})",
            self.capacity, self.error_rate
        );
        Ok(true)
    }

    async fn add(&self, item: &str) -> FilterResult<bool> {
        let mut guard = self.inner.write();
        let inner = guard.as_mut().ok_or(FilterError::NotInitialized)?;

        let seen = inner.bloom.check_and_set(item);
        if !seen {
            inner.items += 1;
        }
        Ok(!seen)
    }

    async fn add_many(&self, items: &[String]) -> FilterResult<Vec<bool>> {
        let mut guard = self.inner.write();
        let inner = guard.as_mut().ok_or(FilterError::NotInitialized)?;

        let added = items
            .iter()
            .map(|item| {
                let seen = inner.bloom.check_and_set(item.as_str());
                if !seen {
                    inner.items += 1;
                }
                !seen
            })
            .collect();
        Ok(added)
    }

    async fn exists(&self, item: &str) -> FilterResult<bool> {
        let guard = self.inner.read();
        let inner = guard.as_ref().ok_or(FilterError::NotInitialized)?;
        Ok(inner.bloom.check(item))
    }

    async fn exists_many(&self, items: &[String]) -> FilterResult<Vec<bool>> {
        let guard = self.inner.read();
        let inner = guard.as_ref().ok_or(FilterError::NotInitialized)?;
        Ok(items.iter().map(|item| inner.bloom.check(item.as_str())).collect())
    }

    async fn info(&self) -> FilterResult<FilterInfo> {
        let guard = self.inner.read();
        let inner = guard.as_ref().ok_or(FilterError::NotInitialized)?;

        let mut info = FilterInfo::new();
        info.insert("backend".into(), json!("memory"));
        info.insert("capacity".into(), json!(self.capacity));
        info.insert("error_rate".into(), json!(self.error_rate));
        info.insert("items_inserted".into(), json!(inner.items));
        info.insert("bits".into(), json!(inner.bloom.len()));
        info.insert(
            "hash_functions".into(),
            json!(inner.bloom.number_of_hash_functions()),
        );
        info.insert(
            "fill_ratio".into(),
            json!(inner.items as f64 / self.capacity.max(1) as f64),
        );
        Ok(info)
    }
}
