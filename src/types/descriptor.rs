//! Static device self-description sent during registration.
//!
//! The descriptor is assembled once by the host from its hardware identity
//! and capability manifest, then serialized fresh for every handshake
//! attempt. Nothing in it changes for the lifetime of the process.

use serde::{Deserialize, Serialize};

/// Full registration document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Hardware and firmware identity.
    pub device_info: DeviceInfo,

    /// Sensor and actuator manifest.
    pub capabilities: Capabilities,
}

/// Hardware and firmware identity of the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub vendor: String,
    pub model: String,
    pub firmware: String,

    /// Local address on the link the collector was discovered over.
    pub ip: String,
    pub port: u16,

    /// Stable hardware identifier; also keys telemetry payloads.
    pub mac: String,
}

/// Capability manifest: what the device can measure and drive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub sensors: Vec<SensorSpec>,
    pub actuators: Vec<ActuatorSpec>,
}

/// One measurable quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub unit: String,

    /// Closed numeric range as `[min, max]`.
    pub range: [f64; 2],

    pub read_only: bool,

    /// Sampling modes the collector may request, e.g. `"periodic"`.
    pub sampling_modes: Vec<String>,
}

/// One controllable output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorSpec {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    /// Commands the collector may issue.
    pub commands: Vec<String>,

    /// State vocabulary reported back to the collector.
    pub state: Vec<String>,
}
