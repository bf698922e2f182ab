//! Device-side discovery, registration, and telemetry uplink for
//! TelemetryBridge collectors.
//!
//! Bridgelink is the firmware core for a network-attached device that finds
//! a telemetry collector on its local network, registers itself, and pushes
//! measurements, recovering automatically when the collector vanishes or
//! moves.
//!
//! # Features
//!
//! - **Zero-config discovery**: collectors announce themselves over UDP;
//!   the device validates and caches the first matching advertisement
//! - **Bounded handshake**: registration retries are capped and paced, so
//!   a tick's worst-case latency is known up front
//! - **Self-healing delivery**: a failed telemetry push invalidates the
//!   cached collector and restarts discovery
//! - **Swappable transport**: the whole core runs against the [`Transport`]
//!   trait, so hosts and tests bring their own network stack
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bridgelink::{
//!     Bridgelink, Capabilities, DeviceDescriptor, DeviceInfo, MeasurementSnapshot,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let descriptor = DeviceDescriptor {
//!         device_info: DeviceInfo {
//!             vendor: "Acme".into(),
//!             model: "EnvNode-1".into(),
//!             firmware: "1.4.2".into(),
//!             ip: "192.168.1.50".into(),
//!             port: 80,
//!             mac: "aa:bb:cc:dd:ee:ff".into(),
//!         },
//!         capabilities: Capabilities::default(),
//!     };
//!
//!     let mut session = Bridgelink::session(descriptor);
//!     let mut ticks = tokio::time::interval(std::time::Duration::from_secs(1));
//!
//!     loop {
//!         ticks.tick().await;
//!         let connected = true; // ask your link layer
//!         let snapshot = MeasurementSnapshot::new("aa:bb:cc:dd:ee:ff", 0)
//!             .with_reading("temperature_c", 21.5);
//!         let status = session.tick(connected, &snapshot).await;
//!         println!("registered: {}", status.registered);
//!     }
//! }
//! ```

// Core types and error handling
mod config;
mod error;
#[cfg(test)]
mod test_utils;
pub mod types;

// Discovery/registration/delivery state machine
pub mod delivery;
pub mod discovery;
pub mod registration;
pub mod session;

// Wire and transport layers
pub mod http;
pub mod net;
pub mod transport;

// Core exports
pub use config::{DIGEST_PORT, LinkConfig, SERVICE_KIND};
pub use error::{Result, UplinkError};
pub use types::*;

// State machine exports
pub use delivery::DeliveryOutcome;
pub use discovery::DigestListener;
pub use registration::RegistrationOutcome;
pub use session::{SessionPhase, UplinkSession};

// Transport exports
pub use net::TokioTransport;
pub use transport::{Connection, Transport};

/// Unified entry point for uplink sessions.
///
/// # Examples
///
/// ```rust,no_run
/// use bridgelink::{Bridgelink, Capabilities, DeviceDescriptor, DeviceInfo};
///
/// # fn descriptor() -> DeviceDescriptor {
/// #     DeviceDescriptor {
/// #         device_info: DeviceInfo {
/// #             vendor: "Acme".into(), model: "EnvNode-1".into(), firmware: "1".into(),
/// #             ip: "192.168.1.50".into(), port: 80, mac: "aa:bb".into(),
/// #         },
/// #         capabilities: Capabilities::default(),
/// #     }
/// # }
/// let session = Bridgelink::session(descriptor());
/// ```
pub struct Bridgelink;

impl Bridgelink {
    /// Create a session over the tokio network stack with protocol defaults.
    pub fn session(descriptor: DeviceDescriptor) -> UplinkSession<TokioTransport> {
        UplinkSession::new(TokioTransport::new(), descriptor, LinkConfig::default())
    }

    /// Create a session with a custom transport and configuration.
    ///
    /// This is the seam hosts use to run the core over their own network
    /// stack (or a simulated one).
    pub fn session_with<T: Transport>(
        transport: T,
        descriptor: DeviceDescriptor,
        config: LinkConfig,
    ) -> UplinkSession<T> {
        UplinkSession::new(transport, descriptor, config)
    }
}
