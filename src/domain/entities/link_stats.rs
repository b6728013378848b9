//! Aggregate counts over all stored links.

/// Snapshot of link counts at a single instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub total_links: i64,
    pub total_accesses: i64,
    /// Links without expiry or expiring in the future.
    pub active_links: i64,
    /// Links whose expiry is in the past but that are not yet purged.
    pub expired_links: i64,
}

impl LinkStats {
    /// Links counted neither as active nor expired.
    pub fn permanent_links(&self) -> i64 {
        self.total_links - self.active_links - self.expired_links
    }
}
