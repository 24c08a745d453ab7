//! Invoice numbers and display dates.
//!
//! The store runs on Western Indonesian Time (UTC+7) regardless of where the
//! client runs, so dates are derived by shifting the UTC instant by a fixed
//! offset rather than by asking the host for its local timezone.

use crate::error::CommerceError;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Store offset from UTC in milliseconds.
pub const STORE_UTC_OFFSET_MS: i64 = 7 * 60 * 60 * 1000;

/// Format used by the API for naive UTC timestamps.
const API_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wall-clock time in the store's timezone.
pub fn store_local(ts: DateTime<Utc>) -> NaiveDateTime {
    (ts + Duration::milliseconds(STORE_UTC_OFFSET_MS)).naive_utc()
}

/// Invoice number for a transaction timestamp, e.g. `INV-06012025`.
pub fn format_invoice_number(ts: DateTime<Utc>) -> String {
    format!("INV-{}", store_local(ts).format("%d%m%Y"))
}

/// Human-readable store-local date and time, e.g. `06/01/2025 03:30`.
pub fn format_display_date(ts: DateTime<Utc>) -> String {
    store_local(ts).format("%d/%m/%Y %H:%M").to_string()
}

/// Parse an API timestamp.
///
/// Accepts RFC 3339 (`2025-01-05T20:30:00Z`, `2025-01-05T20:30:00.000000Z`)
/// and the naive `2025-01-05 20:30:00` form, which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CommerceError> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, API_DATETIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| CommerceError::InvalidTimestamp(trimmed.to_string()))
}

/// Timestamp from Unix milliseconds, as stored by the local cache.
pub fn from_unix_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_rolls_past_midnight() {
        let ts = parse_timestamp("2025-01-05T20:30:00Z").unwrap();
        assert_eq!(format_invoice_number(ts), "INV-06012025");
    }

    #[test]
    fn test_invoice_number_same_day() {
        let ts = parse_timestamp("2025-01-05T10:00:00Z").unwrap();
        assert_eq!(format_invoice_number(ts), "INV-05012025");
    }

    #[test]
    fn test_display_date() {
        let ts = parse_timestamp("2025-01-05T20:30:00Z").unwrap();
        assert_eq!(format_display_date(ts), "06/01/2025 03:30");
    }

    #[test]
    fn test_parse_offset_timestamps_normalize_to_utc() {
        let ts = parse_timestamp("2025-01-06T03:30:00+07:00").unwrap();
        assert_eq!(format_invoice_number(ts), "INV-06012025");
        assert_eq!(ts, parse_timestamp("2025-01-05T20:30:00Z").unwrap());
    }

    #[test]
    fn test_parse_api_naive_format() {
        let ts = parse_timestamp("2025-12-31 17:00:00").unwrap();
        assert_eq!(format_invoice_number(ts), "INV-01012026");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(CommerceError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_from_unix_millis() {
        let ts = from_unix_millis(1_736_109_000_000).unwrap();
        assert_eq!(ts, parse_timestamp("2025-01-05T20:30:00Z").unwrap());
    }
}
