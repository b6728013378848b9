//! DTOs for health check endpoint.

use serde::Serialize;

/// Overall health status response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Individual component health checks.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub cache: CheckStatus,
    pub filter: CheckStatus,
    pub access_queue: CheckStatus,
}

/// Health status for a single component.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    /// `ok` or `error`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn from_flag(ok: bool, ok_message: impl Into<String>, error_message: impl Into<String>) -> Self {
        if ok {
            Self {
                status: "ok".to_string(),
                message: Some(ok_message.into()),
            }
        } else {
            Self {
                status: "error".to_string(),
                message: Some(error_message.into()),
            }
        }
    }
}
