//! DTO for aggregate statistics endpoint.

use serde::Serialize;

use crate::domain::entities::LinkStats;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_links: i64,
    pub total_accesses: i64,
    pub active_links: i64,
    pub expired_links: i64,
    pub permanent_links: i64,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            total_links: stats.total_links,
            total_accesses: stats.total_accesses,
            active_links: stats.active_links,
            expired_links: stats.expired_links,
            permanent_links: stats.permanent_links(),
        }
    }
}
