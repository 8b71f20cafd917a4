//! Conversions between AS1 timestamps and Unix seconds.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDateTime};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format Unix seconds as a naive UTC ISO 8601 timestamp, e.g.
/// `2022-01-02T03:04:05`.
pub fn iso_from_unix(secs: u64) -> Option<String> {
    let secs = i64::try_from(secs).ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc().format(ISO_FORMAT).to_string())
}

/// Parse an ISO 8601 timestamp into Unix seconds. Timestamps without an
/// offset are read as UTC.
pub fn unix_from_iso(value: &str) -> Option<u64> {
    let value = value.trim();
    let secs = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.timestamp(),
        Err(_) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()?
            .and_utc()
            .timestamp(),
    };
    u64::try_from(secs).ok()
}

/// Current Unix time in seconds.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_roundtrip() {
        assert_eq!(
            iso_from_unix(1641092645).as_deref(),
            Some("2022-01-02T03:04:05")
        );
        assert_eq!(unix_from_iso("2022-01-02T03:04:05"), Some(1641092645));
    }

    #[test]
    fn test_offsets_and_fractions() {
        assert_eq!(unix_from_iso("2022-01-02T03:04:05+00:00"), Some(1641092645));
        assert_eq!(unix_from_iso("2022-01-02T04:04:05+01:00"), Some(1641092645));
        assert_eq!(unix_from_iso("2022-01-02T03:04:05.250Z"), Some(1641092645));
        assert_eq!(unix_from_iso("2022-01-02T03:04:05.123456"), Some(1641092645));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(unix_from_iso("yesterday"), None);
        assert_eq!(unix_from_iso("1969-12-31T23:59:59"), None);
    }
}
