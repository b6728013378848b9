//! Store contract for durable link records.

use crate::domain::entities::{Link, LinkStats, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for the authoritative link store.
///
/// The store owns canonical link state and enforces code uniqueness; caches
/// and membership filters only hold derived copies. Every call is
/// request-scoped: dropping the returned future cancels the operation.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link and returns it with store-assigned identity and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] of kind `Conflict` if the code is already taken,
    /// `Internal` on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found, regardless of expiry
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Authoritative existence check for a code.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Adds one to the access count and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] of kind `NotFound` if no link has this code.
    async fn increment_access_count(&self, code: &str) -> Result<(), AppError>;

    /// Lists links created within `[from, to]`, newest first.
    async fn list_by_time_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Deletes every link whose `expires_at` is strictly before `now`.
    ///
    /// Returns the number of rows removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Computes aggregate counts, classifying expiry against `now`.
    async fn aggregate_stats(&self, now: DateTime<Utc>) -> Result<LinkStats, AppError>;

    /// Connectivity check used by health checks.
    async fn ping(&self) -> Result<(), AppError>;
}
