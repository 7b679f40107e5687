//! Timestamp formatting for message bodies.

use chrono::{DateTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format epoch seconds as `yyyy-MM-dd HH:mm:ss` (UTC).
///
/// Out-of-range values fall back to the raw number.
#[must_use]
pub fn format_epoch_seconds(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map_or_else(|| seconds.to_string(), |dt| dt.format(DATE_FORMAT).to_string())
}

/// Format epoch milliseconds as `yyyy-MM-dd HH:mm:ss` (UTC).
#[must_use]
pub fn format_epoch_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map_or_else(|| millis.to_string(), |dt| dt.format(DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_epoch_seconds() {
        assert_eq!(format_epoch_seconds(0), "1970-01-01 00:00:00");
        assert_eq!(format_epoch_seconds(1_700_000_000), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_format_epoch_millis() {
        assert_eq!(format_epoch_millis(1_700_000_000_123), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_out_of_range_falls_back() {
        assert_eq!(format_epoch_seconds(i64::MAX), i64::MAX.to_string());
    }
}
