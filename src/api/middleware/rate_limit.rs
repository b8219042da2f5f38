//! Coarse request-rate limiting using a per-IP token bucket.
//!
//! This caps raw request volume regardless of outcome. It is deliberately
//! separate from the guest creation cooldown in
//! [`crate::application::quota_guard`], which only counts successful guest
//! creations.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Rate limiter for public endpoints.
///
/// # Limits
///
/// - **Rate**: 10 requests per minute (one token every 6 seconds)
/// - **Burst**: 10 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Keys are
/// client IPs taken from the socket peer address.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .period(Duration::from_secs(6))
            .burst_size(10)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}

/// More lenient rate limiter for authenticated endpoints.
///
/// # Limits
///
/// - **Rate**: 100 requests per minute (one token every 600 ms)
/// - **Burst**: 100 requests
pub fn authed_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .period(Duration::from_millis(600))
            .burst_size(100)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}
