//! DTOs for admin endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::infrastructure::filter::FilterInfo;

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub deleted_count: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FilterInfoResponse {
    pub filter: FilterInfo,
}
