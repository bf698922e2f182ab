//! Core data model for the uplink.
//!
//! - [`CollectorInfo`] identifies a discovered collector; it can only be
//!   constructed from a validated advertisement.
//! - [`DeviceDescriptor`] is the static self-description sent at
//!   registration.
//! - [`MeasurementSnapshot`] is one tick's worth of readings, supplied by
//!   the host and serialized for delivery.
//! - [`RegistrationState`] and [`DeviceStatus`] are owned and published by
//!   the session state machine.

mod collector;
mod descriptor;
mod measurement;

pub use collector::{CollectorInfo, MAX_ADDRESS_LEN};
pub use descriptor::{ActuatorSpec, Capabilities, DeviceDescriptor, DeviceInfo, SensorSpec};
pub use measurement::MeasurementSnapshot;

use serde::{Deserialize, Serialize};

/// Where the device stands with the current collector.
///
/// `Registered` is only reachable while a valid [`CollectorInfo`] is cached;
/// the session resets this to `Unregistered` whenever that cache is cleared.
/// `Registering` exists only for the duration of a handshake call: the
/// handshake retries synchronously, so the state is never observed across
/// ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegistrationState {
    #[default]
    Unregistered,
    Registering,
    Registered,
}

/// Snapshot of the uplink handed to the host after every tick, for display
/// or logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Last connectivity flag seen by the session.
    pub connected: bool,

    /// Whether a validated collector identity is cached.
    pub collector_known: bool,

    /// Whether the collector has accepted this device's registration.
    pub registered: bool,
}
