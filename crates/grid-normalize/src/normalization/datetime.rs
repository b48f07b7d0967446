//! Timestamp decoding.
//!
//! Collectors write ISO-8601 strings (`createdAt`, `lastExecutionDate`, ...)
//! but older records carry naive local-less strings, bare dates, or epoch
//! numbers. Everything is canonicalized to UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use grid_model::is_placeholder;
use serde_json::Value;

use super::{Decoded, json_type};

/// Naive date-time layouts, assumed UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Offset layout with a space separator, as written by `str(datetime)`.
const SPACED_OFFSET_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Epoch values at or above this magnitude are milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

/// Only four-digit years render back to parseable RFC 3339.
fn in_range(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    (0..=9999).contains(&ts.year()).then_some(ts)
}

/// Parse a timestamp string.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return in_range(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(trimmed, SPACED_OFFSET_FORMAT) {
        return in_range(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return in_range(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| in_range(naive.and_utc()))
}

/// Interpret an epoch number as seconds or milliseconds.
fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value.abs() >= EPOCH_MILLIS_THRESHOLD {
        value.round()
    } else {
        (value * 1000.0).round()
    };
    DateTime::from_timestamp_millis(millis as i64).and_then(in_range)
}

pub fn decode_timestamp(value: &Value) -> Decoded<DateTime<Utc>> {
    match value {
        Value::Null => Decoded::Missing,
        Value::Number(number) => match number.as_f64().and_then(from_epoch) {
            Some(ts) => Decoded::Value(ts),
            None => Decoded::Malformed(format!("{number} is not an epoch timestamp")),
        },
        Value::String(text) if is_placeholder(text) => Decoded::Missing,
        Value::String(text) => match parse_timestamp(text) {
            Some(ts) => Decoded::Value(ts),
            None => Decoded::Malformed(format!("'{text}' is not a timestamp")),
        },
        other => Decoded::Malformed(format!("unexpected {} for timestamp", json_type(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn rfc3339_with_offset() {
        assert_eq!(
            parse_timestamp("2024-05-01T10:00:00+02:00"),
            Some(utc(2024, 5, 1, 8, 0, 0))
        );
    }

    #[test]
    fn python_str_datetime() {
        assert_eq!(
            parse_timestamp("2024-05-01 10:00:00.250000+00:00").map(|ts| ts.timestamp_millis()),
            Some(utc(2024, 5, 1, 10, 0, 0).timestamp_millis() + 250)
        );
    }

    #[test]
    fn naive_is_utc() {
        assert_eq!(
            parse_timestamp("2024-05-01T10:00:00"),
            Some(utc(2024, 5, 1, 10, 0, 0))
        );
    }

    #[test]
    fn date_only_is_midnight() {
        assert_eq!(parse_timestamp("2024-05-01"), Some(utc(2024, 5, 1, 0, 0, 0)));
    }

    #[test]
    fn epoch_seconds_and_millis() {
        let expected = utc(2024, 5, 1, 0, 0, 0);
        let seconds = expected.timestamp();
        assert_eq!(decode_timestamp(&json!(seconds)), Decoded::Value(expected));
        assert_eq!(
            decode_timestamp(&json!(seconds * 1000)),
            Decoded::Value(expected)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(decode_timestamp(&json!("yesterday")).is_malformed());
        assert_eq!(decode_timestamp(&json!("N/A")), Decoded::Missing);
    }
}
