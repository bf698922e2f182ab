//! Tokio-backed transport implementation.
//!
//! Owns the device's real sockets: a lazily-bound UDP socket for collector
//! advertisements and short-lived TCP streams for the HTTP exchanges. The
//! UDP receive path is non-blocking (`try_recv_from`) so a discovery poll
//! never stalls a tick; the TCP connect path is bounded by a configurable
//! connect timeout because the core's own budgets only start once a
//! connection exists.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, UdpSocket};
use tracing::{debug, info, warn};

use crate::transport::{Connection, Transport};
use crate::{Result, UplinkError};

/// Default bound on a single TCP connect.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Production transport over the tokio network stack.
pub struct TokioTransport {
    /// Advertisement socket, bound on first use.
    socket: Option<UdpSocket>,

    /// Receive buffer size for advertisement datagrams.
    recv_buffer: usize,

    /// Bound on a single TCP connect.
    connect_timeout: Duration,
}

impl TokioTransport {
    /// Create a transport with default limits.
    pub fn new() -> Self {
        Self { socket: None, recv_buffer: 1024, connect_timeout: DEFAULT_CONNECT_TIMEOUT }
    }

    /// Override the TCP connect timeout.
    ///
    /// The discovery/registration/delivery budgets do not include connect
    /// time; this bound is what keeps a dead collector address from wedging
    /// a tick.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the datagram receive buffer size.
    pub fn with_recv_buffer(mut self, bytes: usize) -> Self {
        self.recv_buffer = bytes;
        self
    }

    async fn bind(&mut self, port: u16) -> Result<&UdpSocket> {
        if self.socket.is_none() {
            let socket = UdpSocket::bind(("0.0.0.0", port))
                .await
                .map_err(|source| UplinkError::Bind { port, source })?;
            info!("listening for collector advertisements on udp/{}", port);
            self.socket = Some(socket);
        }
        Ok(self.socket.as_ref().expect("socket bound above"))
    }
}

impl Default for TokioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for TokioTransport {
    type Stream = TcpLink;

    async fn recv_datagram(&mut self, port: u16) -> Result<Option<Vec<u8>>> {
        let recv_buffer = self.recv_buffer;
        let socket = self.bind(port).await?;

        let mut buf = vec![0u8; recv_buffer];
        match socket.try_recv_from(&mut buf) {
            Ok((len, peer)) => {
                debug!("received {} byte datagram from {}", len, peer);
                buf.truncate(len);
                Ok(Some(buf))
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(UplinkError::io("datagram receive", e)),
        }
    }

    async fn connect(&mut self, host: &str, port: u16) -> Result<TcpLink> {
        let connect = TcpStream::connect((host, port));
        match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(stream)) => {
                debug!("connected to {}:{}", host, port);
                Ok(TcpLink { reader: BufReader::new(stream), open: true })
            }
            Ok(Err(e)) => {
                warn!("connect to {}:{} failed: {}", host, port, e);
                Err(UplinkError::connect_failed_with_source(host, port, Box::new(e)))
            }
            Err(_) => {
                warn!("connect to {}:{} timed out", host, port);
                Err(UplinkError::connect_failed(host, port))
            }
        }
    }
}

/// A connected TCP stream with buffered line reads.
#[derive(Debug)]
pub struct TcpLink {
    reader: BufReader<TcpStream>,
    open: bool,
}

#[async_trait::async_trait]
impl Connection for TcpLink {
    async fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.reader
            .get_mut()
            .write_all(bytes)
            .await
            .map_err(|e| UplinkError::io("request write", e))
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| UplinkError::io("response read", e))?;
        if n == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn close(&mut self) {
        if self.open {
            let _ = self.reader.get_mut().shutdown().await;
            self.open = false;
        }
    }
}
