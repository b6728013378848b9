//! Access event model for asynchronous access counting.

use chrono::{DateTime, Utc};

/// A resolved short code waiting to be counted.
///
/// Produced when a resolution is served from cache, so the redirect can be
/// returned without waiting on the store. Consumed by
/// [`crate::domain::access_worker::run_access_worker`].
#[derive(Debug, Clone, PartialEq)]
pub struct AccessEvent {
    pub code: String,
    pub accessed_at: DateTime<Utc>,
}

impl AccessEvent {
    /// Creates an event stamped with the current time.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            accessed_at: Utc::now(),
        }
    }
}
