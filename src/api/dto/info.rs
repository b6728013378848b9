//! DTO for link metadata endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

#[derive(Debug, Serialize)]
pub struct LinkInfoResponse {
    pub short_code: String,
    pub original_url: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Link> for LinkInfoResponse {
    fn from(link: Link) -> Self {
        Self {
            short_code: link.code,
            original_url: link.target_url,
            access_count: link.access_count,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}
