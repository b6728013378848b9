//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// Lifecycle state derived from `expires_at` and the wall clock.
///
/// There is no stored status column; a link moves from `Active` to `Expired`
/// purely by time passing. Purged links no longer exist in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Active,
    Expired,
}

/// A shortened URL with access metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        target_url: String,
        access_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            code,
            target_url,
            access_count,
            created_at,
            updated_at,
            expires_at,
        }
    }

    /// Returns true if `expires_at` is strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e < now)
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> LinkStatus {
        if self.is_expired_at(now) {
            LinkStatus::Expired
        } else {
            LinkStatus::Active
        }
    }
}

/// Input data for creating a new link.
///
/// The store assigns `id`, timestamps and a zero access count.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}
