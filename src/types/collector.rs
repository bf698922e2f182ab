//! Collector identity parsed from discovery advertisements.

use serde::{Deserialize, Serialize};

use crate::{Result, UplinkError};

/// Longest dotted-quad IPv4 literal (`255.255.255.255`).
pub const MAX_ADDRESS_LEN: usize = 15;

/// Identity of a telemetry collector, as learned from an advertisement.
///
/// A `CollectorInfo` only ever comes out of [`CollectorInfo::from_advertisement`],
/// so holding one implies all three fields passed validation together: the
/// service kind matched, the address is a dotted-quad within bounds, and the
/// port is non-zero. The session state machine owns the cached instance and
/// destroys it on connectivity loss or delivery failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorInfo {
    /// Service identifier from the advertisement's `type` field.
    pub kind: String,

    /// Dotted-quad IPv4 address of the collector.
    pub address: String,

    /// TCP port the collector accepts registrations and telemetry on.
    pub port: u16,
}

/// Raw advertisement document as it appears on the wire.
///
/// Unknown additional fields are ignored; the three required fields are
/// validated by [`CollectorInfo::from_advertisement`] before anything is
/// cached.
#[derive(Debug, Deserialize)]
struct Advertisement {
    #[serde(rename = "type")]
    kind: String,
    ip: String,
    port: i64,
}

impl CollectorInfo {
    /// Parse and validate an advertisement datagram.
    ///
    /// The stricter of the two candidate policies applies to oversized
    /// fields: an `ip` longer than a dotted-quad can be is rejected, not
    /// truncated, since a truncated address would be dialed as written.
    pub fn from_advertisement(datagram: &[u8], expected_kind: &str) -> Result<Self> {
        let text = std::str::from_utf8(datagram)
            .map_err(|_| UplinkError::malformed("datagram is not UTF-8"))?;

        let ad: Advertisement = serde_json::from_str(text)
            .map_err(|e| UplinkError::malformed(format!("invalid document: {e}")))?;

        if ad.kind != expected_kind {
            return Err(UplinkError::malformed(format!(
                "unexpected service kind `{}`",
                ad.kind
            )));
        }

        if ad.ip.len() > MAX_ADDRESS_LEN || ad.ip.parse::<std::net::Ipv4Addr>().is_err() {
            return Err(UplinkError::malformed(format!("`ip` is not a dotted quad: `{}`", ad.ip)));
        }

        let port = match u16::try_from(ad.port) {
            Ok(p) if p > 0 => p,
            _ => {
                return Err(UplinkError::malformed(format!("`port` out of range: {}", ad.port)));
            }
        };

        Ok(Self { kind: ad.kind, address: ad.ip, port })
    }
}

impl std::fmt::Display for CollectorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.kind, self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SERVICE_KIND;
    use proptest::prelude::*;

    fn parse(json: &str) -> Result<CollectorInfo> {
        CollectorInfo::from_advertisement(json.as_bytes(), SERVICE_KIND)
    }

    #[test]
    fn well_formed_advertisement_is_accepted() {
        let info =
            parse(r#"{"type":"TelemetryBridge","ip":"10.0.0.5","port":8080}"#).unwrap();
        assert_eq!(info.kind, "TelemetryBridge");
        assert_eq!(info.address, "10.0.0.5");
        assert_eq!(info.port, 8080);
    }

    #[test]
    fn unknown_extra_fields_are_ignored() {
        let info = parse(
            r#"{"type":"TelemetryBridge","ip":"192.168.1.20","port":1883,"version":"2.4","region":"eu"}"#,
        )
        .unwrap();
        assert_eq!(info.address, "192.168.1.20");
    }

    #[test]
    fn wrong_service_kind_is_rejected() {
        let err = parse(r#"{"type":"OtherService","ip":"10.0.0.5","port":8080}"#).unwrap_err();
        assert!(matches!(err, UplinkError::MalformedAdvertisement { .. }));

        // Match is case-sensitive.
        let err = parse(r#"{"type":"telemetrybridge","ip":"10.0.0.5","port":8080}"#).unwrap_err();
        assert!(matches!(err, UplinkError::MalformedAdvertisement { .. }));
    }

    #[test]
    fn missing_fields_are_rejected() {
        assert!(parse(r#"{"type":"TelemetryBridge","ip":"10.0.0.5"}"#).is_err());
        assert!(parse(r#"{"type":"TelemetryBridge","port":8080}"#).is_err());
        assert!(parse(r#"{"ip":"10.0.0.5","port":8080}"#).is_err());
        assert!(parse(r#"{}"#).is_err());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(parse("not json at all").is_err());
        assert!(parse(r#"{"type":"TelemetryBridge","#).is_err());
        assert!(CollectorInfo::from_advertisement(&[0xFF, 0xFE, 0x00], SERVICE_KIND).is_err());
    }

    #[test]
    fn oversized_or_non_quad_addresses_are_rejected_not_truncated() {
        assert!(parse(r#"{"type":"TelemetryBridge","ip":"1050:0:0:0:5:600:300c:1","port":80}"#)
            .is_err());
        assert!(parse(r#"{"type":"TelemetryBridge","ip":"collector.local","port":80}"#).is_err());
        assert!(parse(r#"{"type":"TelemetryBridge","ip":"10.0.0.5.extra.junk","port":80}"#)
            .is_err());
    }

    #[test]
    fn out_of_range_ports_are_rejected() {
        assert!(parse(r#"{"type":"TelemetryBridge","ip":"10.0.0.5","port":0}"#).is_err());
        assert!(parse(r#"{"type":"TelemetryBridge","ip":"10.0.0.5","port":65536}"#).is_err());
        assert!(parse(r#"{"type":"TelemetryBridge","ip":"10.0.0.5","port":-1}"#).is_err());
    }

    proptest! {
        #[test]
        fn prop_wrong_kind_never_parses(kind in "[a-zA-Z0-9]{1,32}") {
            prop_assume!(kind != SERVICE_KIND);
            let json = format!(r#"{{"type":"{kind}","ip":"10.0.0.5","port":8080}}"#);
            prop_assert!(parse(&json).is_err());
        }

        #[test]
        fn prop_valid_quads_round_trip(a in 0u8..=255, b in 0u8..=255, c in 0u8..=255, d in 0u8..=255, port in 1u16..=65535) {
            let ip = format!("{a}.{b}.{c}.{d}");
            let json = format!(r#"{{"type":"TelemetryBridge","ip":"{ip}","port":{port}}}"#);
            let info = parse(&json).unwrap();
            prop_assert_eq!(info.address, ip);
            prop_assert_eq!(info.port, port);
        }
    }
}
