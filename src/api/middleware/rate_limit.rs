//! Rate limiting middleware using token bucket algorithm.

use anyhow::{Context, Result};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Creates a per-IP rate limiter.
///
/// # Limits
///
/// - **Rate**: `per_second` tokens replenished per second
/// - **Burst**: up to `burst` requests at once
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the server must be started with connect info.
///
/// # Errors
///
/// Returns an error if `per_second` or `burst` is zero.
pub fn layer(
    per_second: u64,
    burst: u32,
) -> Result<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let period_ms = (1000 / per_second.max(1)).max(1);

    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(period_ms)
        .burst_size(burst)
        .finish()
        .context("Invalid rate limit configuration")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_builds_with_valid_limits() {
        assert!(layer(10, 100).is_ok());
    }

    #[test]
    fn test_layer_rejects_zero_burst() {
        assert!(layer(10, 0).is_err());
    }
}
