//! Minimal HTTP/1.1 request framing and the one-shot exchange both outbound
//! paths share.
//!
//! Both exchanges in this protocol are single POSTs with a JSON body and
//! `Connection: close`; responses are only ever scanned for a success status
//! line. A full HTTP client would be dead weight on a device this
//! constrained, so requests are framed by hand, byte-for-byte what the
//! collector expects.

use std::time::Duration;
use tracing::trace;

use crate::transport::{Connection, Transport};
use crate::types::CollectorInfo;
use crate::{Result, UplinkError};

/// Status line prefix that marks an exchange as accepted.
pub const SUCCESS_LINE: &str = "HTTP/1.1 200";

/// Frame a `POST` request with a JSON body and `Connection: close`.
pub fn post_request(host: &str, path: &str, body: &str) -> String {
    format!(
        "POST {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {len}\r\n\
         Connection: close\r\n\r\n\
         {body}",
        len = body.len(),
    )
}

/// Whether a response line reports success.
pub fn is_success_line(line: &str) -> bool {
    line.starts_with(SUCCESS_LINE)
}

/// Perform one request/response exchange against the collector.
///
/// Opens a fresh connection, sends the framed request, and scans response
/// lines for a success status line within `response_timeout`. The connection
/// is closed on every path. An early close without a success line counts the
/// same as running out the budget.
pub(crate) async fn post_once<T: Transport>(
    transport: &mut T,
    collector: &CollectorInfo,
    path: &str,
    body: &str,
    response_timeout: Duration,
) -> Result<()> {
    let request = post_request(&collector.address, path, body);

    let mut link = transport.connect(&collector.address, collector.port).await?;
    let outcome = exchange(&mut link, &request, response_timeout).await;
    link.close().await;
    outcome
}

async fn exchange<C: Connection>(
    link: &mut C,
    request: &str,
    response_timeout: Duration,
) -> Result<()> {
    link.write_all(request.as_bytes()).await?;

    match tokio::time::timeout(response_timeout, scan_for_success(link)).await {
        Ok(Ok(true)) => Ok(()),
        Ok(Ok(false)) | Err(_) => Err(UplinkError::ResponseTimeout { budget: response_timeout }),
        Ok(Err(e)) => Err(e),
    }
}

/// Read response lines until a success line or end of stream.
async fn scan_for_success<C: Connection>(link: &mut C) -> Result<bool> {
    while let Some(line) = link.read_line().await? {
        trace!("response: {}", line);
        if is_success_line(&line) {
            return Ok(true);
        }
    }
    Ok(false)
}
