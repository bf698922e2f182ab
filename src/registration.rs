//! Registration handshake with a discovered collector.
//!
//! The device announces itself by POSTing its descriptor document to the
//! collector's `/register` endpoint. The handshake is deliberately stubborn
//! but bounded: up to three attempts, a fixed one-second pause after each
//! failure, and a five-second budget on every response wait. From the
//! caller's point of view this is one blocking call; the worst case is
//! attempts × (connect bound + response budget + pause).

use tracing::{debug, info, warn};

use crate::config::LinkConfig;
use crate::http;
use crate::transport::Transport;
use crate::types::{CollectorInfo, DeviceDescriptor};
use crate::UplinkError;

/// Result of one handshake invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A success status line was observed.
    Success,
    /// The device was already registered; nothing was sent.
    AlreadyDone,
    /// Every attempt was consumed without a success line.
    Failed,
}

/// Register the device with `collector`.
///
/// Serializes `descriptor` fresh and performs up to
/// `config.register_attempts` exchanges. Every failed attempt is followed by
/// a `config.retry_pause` sleep with no backoff growth; the attempt count
/// and pacing are observable protocol behavior. Returns on the first attempt
/// that sees a success line.
pub async fn register<T: Transport>(
    transport: &mut T,
    collector: &CollectorInfo,
    descriptor: &DeviceDescriptor,
    already_registered: bool,
    config: &LinkConfig,
) -> RegistrationOutcome {
    if already_registered {
        debug!("already registered with {}, skipping handshake", collector);
        return RegistrationOutcome::AlreadyDone;
    }

    let body = serde_json::to_string(descriptor).expect("descriptor serialization is infallible");

    for attempt in 1..=config.register_attempts {
        debug!("registration attempt {}/{} against {}", attempt, config.register_attempts, collector);

        match http::post_once(
            transport,
            collector,
            &config.register_path,
            &body,
            config.response_timeout,
        )
        .await
        {
            Ok(()) => {
                info!("registered with {} on attempt {}", collector, attempt);
                return RegistrationOutcome::Success;
            }
            Err(e) => {
                warn!(
                    "registration attempt {}/{} failed: {}",
                    attempt, config.register_attempts, e
                );
                tokio::time::sleep(config.retry_pause).await;
            }
        }
    }

    warn!("{}", UplinkError::RegistrationExhausted { attempts: config.register_attempts });
    RegistrationOutcome::Failed
}
