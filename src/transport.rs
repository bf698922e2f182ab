//! Transport trait for network collaborators.
//!
//! The uplink core never touches sockets directly. Everything it needs from
//! the outside world (one inbound datagram at a time, and byte streams it
//! can write a request to and read response lines from) comes through this
//! seam. The production implementation is [`crate::net::TokioTransport`];
//! tests drive the core with scripted implementations.

use crate::Result;

/// Trait for the device's network stack.
///
/// Implementations own any sockets involved. `recv_datagram` must be
/// non-blocking in spirit: return at most one pending packet and never wait
/// for one to arrive. `connect` may block up to the implementation's own
/// connect timeout; the core's attempt and response budgets sit above it.
#[async_trait::async_trait]
pub trait Transport: Send + 'static {
    /// Stream type returned by [`Transport::connect`].
    type Stream: Connection;

    /// Fetch one pending datagram on `port`, if any.
    ///
    /// The first call arms the port (binds the underlying socket); a bind
    /// failure is returned as [`crate::UplinkError::Bind`] and may be retried
    /// on a later call.
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` - One packet was pending
    /// - `Ok(None)` - Nothing pending right now
    /// - `Err(e)` - Bind or receive failure
    async fn recv_datagram(&mut self, port: u16) -> Result<Option<Vec<u8>>>;

    /// Open a byte stream to `host:port`.
    async fn connect(&mut self, host: &str, port: u16) -> Result<Self::Stream>;
}

/// A connected byte stream with line-oriented reads.
#[async_trait::async_trait]
pub trait Connection: Send {
    /// Write the full buffer to the peer.
    async fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read one line, without the trailing newline.
    ///
    /// Returns `Ok(None)` once the peer has closed the stream.
    async fn read_line(&mut self) -> Result<Option<String>>;

    /// Whether the stream is still usable.
    fn is_open(&self) -> bool;

    /// Shut the stream down. Further reads and writes return errors.
    async fn close(&mut self);
}
