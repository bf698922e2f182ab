//! Protocol constants and tunables for the uplink core.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Well-known UDP port collectors advertise on.
pub const DIGEST_PORT: u16 = 9999;

/// Service identifier a collector advertisement must carry.
pub const SERVICE_KIND: &str = "TelemetryBridge";

/// Configuration for discovery, registration, and delivery.
///
/// The defaults encode the protocol as deployed: discovery on UDP 9999,
/// three registration attempts with a one-second pause between them, and a
/// five-second response budget on every HTTP exchange. Tests and integrators
/// can override individual fields, but note that the attempt count and pause
/// are observable protocol behavior, not free parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// UDP port the digest listener binds.
    pub digest_port: u16,

    /// Expected `type` value in collector advertisements (case-sensitive).
    pub service_kind: String,

    /// Request path for the registration handshake.
    pub register_path: String,

    /// Request path for telemetry delivery.
    pub data_path: String,

    /// Maximum registration attempts per handshake invocation.
    pub register_attempts: u32,

    /// Pause after each failed registration attempt.
    pub retry_pause: Duration,

    /// Budget for observing a success status line after a request is sent.
    pub response_timeout: Duration,

    /// Upper bound on an inbound advertisement datagram.
    pub max_datagram: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            digest_port: DIGEST_PORT,
            service_kind: SERVICE_KIND.to_string(),
            register_path: "/register".to_string(),
            data_path: "/data".to_string(),
            register_attempts: 3,
            retry_pause: Duration::from_secs(1),
            response_timeout: Duration::from_secs(5),
            max_datagram: 1024,
        }
    }
}
