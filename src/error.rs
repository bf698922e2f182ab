//! Error types for the uplink core.
//!
//! All failures in this crate degrade to "try again next tick" or "go back to
//! discovery"; nothing here is fatal to the host process. The variants map
//! directly onto the recovery paths of the session state machine:
//!
//! - **LinkDown**: connectivity is gone; the session performs a full reset.
//! - **MalformedAdvertisement**: a discovery datagram failed validation; it is
//!   discarded and the listener keeps waiting.
//! - **Bind**: the discovery port could not be opened; the listener stays
//!   inactive and retries the bind on a later poll.
//! - **ConnectFailed / ResponseTimeout**: one handshake or delivery attempt
//!   failed; counts against the handshake's attempt budget, terminal for a
//!   single-attempt delivery.
//! - **RegistrationExhausted**: every handshake attempt was consumed; the
//!   device stays unregistered and retries on the next tick.
//! - **DeliveryFailed**: a telemetry push failed; the session invalidates the
//!   cached collector and re-enters discovery.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for uplink operations.
pub type Result<T, E = UplinkError> = std::result::Result<T, E>;

/// Main error type for the discovery/registration/delivery core.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UplinkError {
    #[error("network link is down")]
    LinkDown,

    #[error("malformed collector advertisement: {reason}")]
    MalformedAdvertisement { reason: String },

    #[error("failed to bind discovery port {port}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to connect to {host}:{port}")]
    ConnectFailed {
        host: String,
        port: u16,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("no success response within {budget:?}")]
    ResponseTimeout { budget: Duration },

    #[error("registration failed after {attempts} attempts")]
    RegistrationExhausted { attempts: u32 },

    #[error("telemetry delivery to {host}:{port} failed")]
    DeliveryFailed { host: String, port: u16 },

    #[error("transport I/O error during {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl UplinkError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// Everything in this core is recoverable at *some* cadence; this
    /// classification answers the narrower question of whether retrying the
    /// same operation can succeed without new external input. A malformed
    /// advertisement will stay malformed; a connect failure may clear up.
    pub fn is_retryable(&self) -> bool {
        match self {
            UplinkError::LinkDown => true,
            UplinkError::MalformedAdvertisement { .. } => false,
            UplinkError::Bind { .. } => true,
            UplinkError::ConnectFailed { .. } => true,
            UplinkError::ResponseTimeout { .. } => true,
            UplinkError::RegistrationExhausted { .. } => true,
            UplinkError::DeliveryFailed { .. } => false,
            UplinkError::Io { .. } => true,
        }
    }

    /// Helper constructor for malformed advertisement errors.
    pub fn malformed(reason: impl Into<String>) -> Self {
        UplinkError::MalformedAdvertisement { reason: reason.into() }
    }

    /// Helper constructor for connect failures.
    pub fn connect_failed(host: impl Into<String>, port: u16) -> Self {
        UplinkError::ConnectFailed { host: host.into(), port, source: None }
    }

    /// Helper constructor for connect failures with an underlying cause.
    pub fn connect_failed_with_source(
        host: impl Into<String>,
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        UplinkError::ConnectFailed { host: host.into(), port, source: Some(source) }
    }

    /// Helper constructor for transport I/O errors with operation context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        UplinkError::Io { context: context.into(), source }
    }
}
