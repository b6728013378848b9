//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CreateLink, LinkSummary};

/// Request to shorten a URL.
///
/// Only presence and rough size are checked here; URL normalization and
/// custom code rules are enforced by the service.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL. A missing scheme defaults to `http://`.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Optional custom short code.
    pub custom_code: Option<String>,

    /// Optional expiry timestamp. After this time, the link returns 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShortenRequest> for CreateLink {
    fn from(req: ShortenRequest) -> Self {
        Self {
            url: req.url,
            custom_code: req.custom_code,
            expires_at: req.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<LinkSummary> for ShortenResponse {
    fn from(summary: LinkSummary) -> Self {
        Self {
            short_url: summary.short_url,
            short_code: summary.code,
            original_url: summary.target_url,
            expires_at: summary.expires_at,
            created_at: summary.created_at,
        }
    }
}
