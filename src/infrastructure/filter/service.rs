//! Membership filter trait and error types.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// Errors that can occur during filter operations.
///
/// A failure is never a negative answer: callers that get `Err` must ask
/// the authoritative store instead of assuming the code is free.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Filter backend unavailable: {0}")]
    Unavailable(String),

    #[error("Filter command failed: {0}")]
    Command(String),

    #[error("Filter has not been initialized")]
    NotInitialized,

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),
}

impl From<redis::RedisError> for FilterError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
            FilterError::Unavailable(e.to_string())
        } else {
            FilterError::Command(e.to_string())
        }
    }
}

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Diagnostic key/value map returned by [`MembershipFilter::info`].
pub type FilterInfo = BTreeMap<String, Value>;

/// Probabilistic set of used short codes.
///
/// No false negatives: if `exists` returns `Ok(false)` the code was never
/// added. `Ok(true)` only means "possibly present" and must be confirmed
/// against the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipFilter: Send + Sync {
    /// Creates the underlying structure if it does not exist yet.
    ///
    /// Idempotent. Returns `true` when a new, empty filter was created.
    async fn initialize(&self) -> FilterResult<bool>;

    /// Adds one item. Returns `true` if the item was definitely new.
    async fn add(&self, item: &str) -> FilterResult<bool>;

    /// Adds several items, returning one flag per item in input order.
    async fn add_many(&self, items: &[String]) -> FilterResult<Vec<bool>>;

    /// Tests one item: `false` is definitely absent, `true` is possibly present.
    async fn exists(&self, item: &str) -> FilterResult<bool>;

    /// Tests several items, returning one flag per item in input order.
    async fn exists_many(&self, items: &[String]) -> FilterResult<Vec<bool>>;

    /// Backend diagnostics (capacity, fill ratio, item count). Observability only.
    async fn info(&self) -> FilterResult<FilterInfo>;
}
