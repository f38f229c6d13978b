//! Time utility functions

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// ISO 8601 date or date-time, anchored at the start of the input
fn iso_timestamp_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(
            r"^\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2}(?::\d{2}(?:\.\d{1,9})?)?(?:Z|[+-]\d{2}:?\d{2})?)?",
        )
        .expect("Invalid regex")
    })
}

/// Length of the ISO 8601 timestamp at the start of `s`, if there is one
pub fn timestamp_prefix_len(s: &str) -> Option<usize> {
    iso_timestamp_regex().find(s).map(|m| m.end())
}

/// Whether the whole of `s` looks like an ISO 8601 timestamp
pub fn looks_like_timestamp(s: &str) -> bool {
    timestamp_prefix_len(s) == Some(s.len())
}

/// Parse an ISO 8601 / RFC 3339 timestamp string to DateTime<Utc>
///
/// Date-only input means midnight UTC; a date-time without offset is UTC.
/// Returns `None` for text that is not a real calendar instant.
pub fn parse_iso_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let normalized = match ts.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => ts.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"] {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_recognizes_timestamp_shapes() {
        assert!(looks_like_timestamp("2020-01-01"));
        assert!(looks_like_timestamp("2020-01-01T00:00:00Z"));
        assert!(looks_like_timestamp("2020-01-01T10:30"));
        assert!(looks_like_timestamp("2020-01-01T10:30:15.123+02:00"));
        assert!(!looks_like_timestamp("Jo"));
        assert!(!looks_like_timestamp("2020"));
        assert!(!looks_like_timestamp("2020-01-01 trailing"));
    }

    #[test]
    fn test_prefix_len_stops_at_delimiter() {
        assert_eq!(timestamp_prefix_len("2020-01-01)"), Some(10));
        assert_eq!(timestamp_prefix_len("42"), None);
    }

    #[test]
    fn test_parses_rfc3339_utc() {
        let dt = parse_iso_timestamp("2020-01-01T00:00:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parses_offset_into_utc() {
        let dt = parse_iso_timestamp("2024-06-01T12:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let dt = parse_iso_timestamp("2024-02-29").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 2, 29));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_naive_date_time_is_utc() {
        let dt = parse_iso_timestamp("2024-01-15T08:45").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (8, 45));
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(parse_iso_timestamp("2023-02-29").is_none());
        assert!(parse_iso_timestamp("2020-13-01T00:00:00Z").is_none());
    }
}
