//! Digest listener: turns collector advertisement datagrams into
//! [`CollectorInfo`] records.
//!
//! Collectors announce themselves by broadcasting a small JSON document on a
//! well-known UDP port. The listener checks for at most one pending datagram
//! per poll, validates it strictly, and hands the caller a [`CollectorInfo`]
//! on success. There is no retry counter and no backoff: a malformed
//! datagram is discarded and the listener simply waits for the next one.

use tracing::{debug, info, warn};

use crate::config::LinkConfig;
use crate::transport::Transport;
use crate::types::CollectorInfo;

/// Listens for collector advertisements on the digest port.
///
/// Once an advertisement is accepted the listener short-circuits and stops
/// reading until the caller invalidates the cached collector (delivery
/// failure) or connectivity drops. The caller owns the returned
/// [`CollectorInfo`]; the listener only tracks whether one is outstanding.
#[derive(Debug, Default)]
pub struct DigestListener {
    /// An accepted advertisement is outstanding with the caller.
    accepted: bool,
}

impl DigestListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check for one advertisement datagram.
    ///
    /// - With `connected == false`, clears the short-circuit and returns
    ///   `None`; the listener must be ready to listen again once the link
    ///   returns.
    /// - While an accepted advertisement is outstanding, returns `None`
    ///   without touching the socket.
    /// - Otherwise reads at most one pending datagram and validates it.
    ///   A bind or receive failure is logged and swallowed; the next poll
    ///   tries again.
    pub async fn poll<T: Transport>(
        &mut self,
        transport: &mut T,
        connected: bool,
        config: &LinkConfig,
    ) -> Option<CollectorInfo> {
        if !connected {
            self.accepted = false;
            return None;
        }

        if self.accepted {
            return None;
        }

        let datagram = match transport.recv_datagram(config.digest_port).await {
            Ok(Some(datagram)) => datagram,
            Ok(None) => return None,
            Err(e) => {
                warn!("discovery receive failed: {}", e);
                return None;
            }
        };

        if datagram.len() > config.max_datagram {
            debug!("discarding {} byte datagram (over {} byte limit)", datagram.len(), config.max_datagram);
            return None;
        }

        match CollectorInfo::from_advertisement(&datagram, &config.service_kind) {
            Ok(info) => {
                info!("collector discovered: {}", info);
                self.accepted = true;
                Some(info)
            }
            Err(e) => {
                debug!("discarding datagram: {}", e);
                None
            }
        }
    }

    /// Re-arm the listener after the caller invalidates its collector.
    pub fn invalidate(&mut self) {
        self.accepted = false;
    }
}
