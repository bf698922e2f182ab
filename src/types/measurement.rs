//! Measurement snapshots and the telemetry payload they serialize into.

use serde::Serialize;
use std::collections::BTreeMap;

/// One set of readings, handed to the session by the host each tick.
///
/// The snapshot is borrowed for the duration of the tick and serialized if
/// the device is registered; it is never retained. Readings are keyed by
/// name and flattened into the top level of the payload, so a snapshot with
/// `temperature_c: 21.5` produces `{"mac":…,"timestamp":…,"temperature_c":21.5}`
/// on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementSnapshot {
    /// Hardware identifier of the reporting device.
    pub mac: String,

    /// Milliseconds since device boot.
    pub timestamp: u64,

    /// Named numeric readings.
    #[serde(flatten)]
    pub readings: BTreeMap<String, f64>,
}

impl MeasurementSnapshot {
    /// Snapshot with no readings yet.
    pub fn new(mac: impl Into<String>, timestamp: u64) -> Self {
        Self { mac: mac.into(), timestamp, readings: BTreeMap::new() }
    }

    /// Add or replace one named reading.
    pub fn with_reading(mut self, name: impl Into<String>, value: f64) -> Self {
        self.readings.insert(name.into(), value);
        self
    }

    /// Serialize to the `/data` payload body.
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self).expect("snapshot serialization is infallible")
    }
}
