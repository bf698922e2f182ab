//! Scripted transport mocks for driving the uplink core in tests.
//!
//! `ScriptedTransport` replays a queue of datagram events and connect
//! outcomes, and records every connect attempt and request body so tests can
//! assert on attempt counts and wire content.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::transport::{Connection, Transport};
use crate::{Result, UplinkError};

/// One scripted answer to a `recv_datagram` call.
#[derive(Debug, Clone)]
pub enum DatagramEvent {
    /// Nothing pending this poll.
    Idle,
    /// One packet pending.
    Packet(Vec<u8>),
    /// The bind itself fails this poll.
    BindError,
}

/// One scripted answer to a `connect` call.
#[derive(Debug, Clone)]
pub enum ConnectScript {
    /// Connection refused.
    Refuse,
    /// Connect succeeds; the peer sends these lines, then closes.
    Respond(Vec<String>),
    /// Connect succeeds; the peer accepts writes but never responds.
    Silent,
}

impl ConnectScript {
    pub fn ok() -> Self {
        ConnectScript::Respond(vec!["HTTP/1.1 200 OK".to_string()])
    }

    pub fn server_error() -> Self {
        ConnectScript::Respond(vec!["HTTP/1.1 500 Internal Server Error".to_string()])
    }
}

/// Shared view into what a [`ScriptedTransport`] observed.
#[derive(Debug, Clone, Default)]
pub struct TransportLog {
    connects: Arc<Mutex<Vec<(String, u16)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TransportLog {
    pub fn connect_attempts(&self) -> Vec<(String, u16)> {
        self.connects.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Transport that replays scripted events instead of touching sockets.
#[derive(Default)]
pub struct ScriptedTransport {
    datagrams: VecDeque<DatagramEvent>,
    connects: VecDeque<ConnectScript>,
    log: TransportLog,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_packet(&mut self, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.datagrams.push_back(DatagramEvent::Packet(bytes.into()));
        self
    }

    pub fn queue_idle(&mut self) -> &mut Self {
        self.datagrams.push_back(DatagramEvent::Idle);
        self
    }

    pub fn queue_bind_error(&mut self) -> &mut Self {
        self.datagrams.push_back(DatagramEvent::BindError);
        self
    }

    pub fn expect_connect(&mut self, script: ConnectScript) -> &mut Self {
        self.connects.push_back(script);
        self
    }

    /// Datagram events not yet consumed by a poll.
    pub fn datagrams_remaining(&self) -> usize {
        self.datagrams.len()
    }

    /// Handle for inspecting activity after the transport is moved away.
    pub fn log(&self) -> TransportLog {
        self.log.clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    type Stream = ScriptedConnection;

    async fn recv_datagram(&mut self, port: u16) -> Result<Option<Vec<u8>>> {
        match self.datagrams.pop_front() {
            None | Some(DatagramEvent::Idle) => Ok(None),
            Some(DatagramEvent::Packet(bytes)) => Ok(Some(bytes)),
            Some(DatagramEvent::BindError) => Err(UplinkError::Bind {
                port,
                source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "scripted bind failure"),
            }),
        }
    }

    async fn connect(&mut self, host: &str, port: u16) -> Result<ScriptedConnection> {
        self.log.connects.lock().unwrap().push((host.to_string(), port));
        match self.connects.pop_front() {
            None | Some(ConnectScript::Refuse) => Err(UplinkError::connect_failed(host, port)),
            Some(ConnectScript::Respond(lines)) => Ok(ScriptedConnection {
                lines: lines.into(),
                silent: false,
                open: true,
                requests: Arc::clone(&self.log.requests),
            }),
            Some(ConnectScript::Silent) => Ok(ScriptedConnection {
                lines: VecDeque::new(),
                silent: true,
                open: true,
                requests: Arc::clone(&self.log.requests),
            }),
        }
    }
}

/// Connection handed out by [`ScriptedTransport`].
pub struct ScriptedConnection {
    lines: VecDeque<String>,
    silent: bool,
    open: bool,
    requests: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl Connection for ScriptedConnection {
    async fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.requests.lock().unwrap().push(String::from_utf8_lossy(bytes).into_owned());
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        if self.silent {
            // Peer never answers; only the caller's timeout gets us out.
            std::future::pending::<()>().await;
            unreachable!();
        }
        Ok(self.lines.pop_front())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn close(&mut self) {
        self.open = false;
    }
}

/// A valid advertisement for `10.0.0.5:8080`.
pub fn sample_advertisement() -> Vec<u8> {
    br#"{"type":"TelemetryBridge","ip":"10.0.0.5","port":8080}"#.to_vec()
}

/// A minimal but complete device descriptor.
pub fn sample_descriptor() -> crate::DeviceDescriptor {
    use crate::{ActuatorSpec, Capabilities, DeviceDescriptor, DeviceInfo, SensorSpec};

    DeviceDescriptor {
        device_info: DeviceInfo {
            vendor: "Acme".to_string(),
            model: "EnvNode-1".to_string(),
            firmware: "1.4.2".to_string(),
            ip: "192.168.1.50".to_string(),
            port: 80,
            mac: "aa:bb:cc:dd:ee:ff".to_string(),
        },
        capabilities: Capabilities {
            sensors: vec![SensorSpec {
                id: "temp0".to_string(),
                kind: "temperature".to_string(),
                unit: "celsius".to_string(),
                range: [-40.0, 85.0],
                read_only: true,
                sampling_modes: vec!["periodic".to_string()],
            }],
            actuators: vec![ActuatorSpec {
                id: "led0".to_string(),
                kind: "led".to_string(),
                commands: vec!["on".to_string(), "off".to_string()],
                state: vec!["on".to_string(), "off".to_string()],
            }],
        },
    }
}

/// A snapshot with a couple of environmental readings.
pub fn sample_snapshot() -> crate::MeasurementSnapshot {
    crate::MeasurementSnapshot::new("aa:bb:cc:dd:ee:ff", 120_000)
        .with_reading("temperature_c", 21.5)
        .with_reading("humidity_percent", 48.0)
}
