//! Session state machine: orchestrates discovery, registration, and
//! delivery across ticks.
//!
//! The session owns all cross-step state (the cached [`CollectorInfo`], the
//! [`RegistrationState`], and the digest listener's short-circuit) and is
//! the only place any of it is mutated. The three worker components borrow
//! what they need per call and return plain outcomes.
//!
//! One [`tick`](UplinkSession::tick) drives the machine as far as events
//! allow: an advertisement can be accepted, the handshake completed, and a
//! payload delivered all within a single tick. The cross-cutting recovery
//! rule lives here too: a delivery failure destroys the cached collector so
//! the next tick re-enters discovery instead of reusing a stale address.

use futures::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::config::LinkConfig;
use crate::delivery::{self, DeliveryOutcome};
use crate::discovery::DigestListener;
use crate::registration::{self, RegistrationOutcome};
use crate::transport::Transport;
use crate::types::{
    CollectorInfo, DeviceDescriptor, DeviceStatus, MeasurementSnapshot, RegistrationState,
};

/// Observable phase of the session, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No connectivity.
    Idle,
    /// Connected, waiting for a collector advertisement.
    Discovering,
    /// Collector known, handshake not yet accepted.
    RegisteringNeeded,
    /// Registered; delivering telemetry every tick.
    Active,
}

/// The discovery/registration/delivery state machine.
///
/// Driven by the host at a roughly fixed cadence; there is no terminal
/// state and cancellation is simply ceasing to call
/// [`tick`](UplinkSession::tick). Registration and delivery block the tick
/// for up to their worst-case budgets, which is acceptable because the
/// device has no other concurrent duties.
pub struct UplinkSession<T: Transport> {
    transport: T,
    listener: DigestListener,
    descriptor: DeviceDescriptor,
    config: LinkConfig,

    collector: Option<CollectorInfo>,
    registration: RegistrationState,
    connected: bool,

    status_tx: watch::Sender<DeviceStatus>,
}

impl<T: Transport> UplinkSession<T> {
    /// Create a session around a transport and the device's descriptor.
    pub fn new(transport: T, descriptor: DeviceDescriptor, config: LinkConfig) -> Self {
        let (status_tx, _) = watch::channel(DeviceStatus::default());
        Self {
            transport,
            listener: DigestListener::new(),
            descriptor,
            config,
            collector: None,
            registration: RegistrationState::Unregistered,
            connected: false,
            status_tx,
        }
    }

    /// Advance the machine one step.
    ///
    /// `connected` is the host's connectivity flag; `measurements` is this
    /// tick's snapshot, serialized and delivered only if the device is
    /// registered. Returns the status snapshot for display or logging.
    pub async fn tick(
        &mut self,
        connected: bool,
        measurements: &MeasurementSnapshot,
    ) -> DeviceStatus {
        if !connected {
            if self.collector.is_some() || self.registration != RegistrationState::Unregistered {
                debug!("link down, resetting collector and registration state");
            }
            self.collector = None;
            self.registration = RegistrationState::Unregistered;
            // Clears the listener's short-circuit so discovery restarts
            // as soon as the link returns.
            let _ = self.listener.poll(&mut self.transport, false, &self.config).await;
            self.connected = false;
            return self.publish();
        }
        self.connected = true;

        if self.collector.is_none() {
            if let Some(info) = self.listener.poll(&mut self.transport, true, &self.config).await {
                self.collector = Some(info);
            }
        }

        if let Some(collector) = self.collector.clone() {
            let already = self.registration == RegistrationState::Registered;
            if !already {
                self.registration = RegistrationState::Registering;
            }
            match registration::register(
                &mut self.transport,
                &collector,
                &self.descriptor,
                already,
                &self.config,
            )
            .await
            {
                RegistrationOutcome::Success | RegistrationOutcome::AlreadyDone => {
                    self.registration = RegistrationState::Registered;
                }
                RegistrationOutcome::Failed => {
                    // Collector info is retained; only delivery failures
                    // invalidate it. Retry the handshake next tick.
                    self.registration = RegistrationState::Unregistered;
                    debug!("registration exhausted, will retry next tick");
                }
            }

            if self.registration == RegistrationState::Registered {
                let body = measurements.to_payload();
                match delivery::deliver(&mut self.transport, &collector, &body, &self.config).await
                {
                    DeliveryOutcome::Success => {}
                    DeliveryOutcome::Failed => {
                        warn!("invalidating collector {} after failed delivery", collector);
                        self.collector = None;
                        self.registration = RegistrationState::Unregistered;
                        self.listener.invalidate();
                    }
                }
            }
        }

        self.publish()
    }

    /// Current phase, derived from connectivity and cached state.
    pub fn phase(&self) -> SessionPhase {
        if !self.connected {
            SessionPhase::Idle
        } else if self.collector.is_none() {
            SessionPhase::Discovering
        } else if self.registration != RegistrationState::Registered {
            SessionPhase::RegisteringNeeded
        } else {
            SessionPhase::Active
        }
    }

    /// The collector the session is currently bound to, if any.
    pub fn collector(&self) -> Option<&CollectorInfo> {
        self.collector.as_ref()
    }

    /// Status snapshots as a stream, one per tick.
    ///
    /// Backed by a watch channel, so a slow consumer only ever sees the
    /// latest snapshot.
    pub fn status_updates(&self) -> impl Stream<Item = DeviceStatus> + 'static {
        WatchStream::new(self.status_tx.subscribe())
    }

    fn publish(&self) -> DeviceStatus {
        let status = DeviceStatus {
            connected: self.connected,
            collector_known: self.collector.is_some(),
            registered: self.registration == RegistrationState::Registered,
        };
        let previous = *self.status_tx.borrow();
        if previous != status {
            info!(
                "uplink status: connected={} collector_known={} registered={}",
                status.connected, status.collector_known, status.registered
            );
        }
        let _ = self.status_tx.send(status);
        status
    }
}
