//! Telemetry delivery to a registered collector.
//!
//! A single attempt per invocation: one POST to `/data`, one scan for a
//! success line under the response budget. Retry policy lives above this
//! module: the session reacts to a failure by invalidating the cached
//! collector and going back to discovery, which is the system's sole
//! cross-cutting recovery mechanism.

use tracing::{debug, warn};

use crate::config::LinkConfig;
use crate::http;
use crate::transport::Transport;
use crate::types::CollectorInfo;

/// Result of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// A success status line was observed.
    Success,
    /// Connect failure, timeout, or no success line before close.
    Failed,
}

/// Push one serialized measurement payload to `collector`.
///
/// Never mutates collector state; the caller decides what a failure means.
pub async fn deliver<T: Transport>(
    transport: &mut T,
    collector: &CollectorInfo,
    body: &str,
    config: &LinkConfig,
) -> DeliveryOutcome {
    match http::post_once(transport, collector, &config.data_path, body, config.response_timeout)
        .await
    {
        Ok(()) => {
            debug!("telemetry accepted by {}", collector);
            DeliveryOutcome::Success
        }
        Err(e) => {
            warn!("telemetry delivery to {} failed: {}", collector, e);
            DeliveryOutcome::Failed
        }
    }
}
