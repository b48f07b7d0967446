//! Canonical field values.
//!
//! A [`FieldValue`] is what a declared field holds after normalization. The
//! display rendering defined here is the single source of truth for both
//! on-screen cells and exported cells.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Byte units, largest first, used by [`format_bytes`].
const BYTE_UNITS: [(&str, u64); 5] = [
    ("PB", 1 << 50),
    ("TB", 1 << 40),
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
];

/// A normalized field value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FieldValue {
    /// No usable value (missing, placeholder, or unparseable).
    #[default]
    Absent,
    Bool(bool),
    /// Always finite.
    Number(f64),
    Text(String),
    /// Non-empty strings in source order.
    List(Vec<String>),
    Tags(BTreeMap<String, String>),
    Object(Map<String, Value>),
    Bytes(u64),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Returns true for [`FieldValue::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns true when the value carries no content.
    ///
    /// Empty text, lists, tag maps and objects are considered empty, as is
    /// `Absent`. Numbers, booleans, byte counts and timestamps never are.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Tags(tags) => tags.is_empty(),
            Self::Object(map) => map.is_empty(),
            Self::Bool(_) | Self::Number(_) | Self::Bytes(_) | Self::Timestamp(_) => false,
        }
    }

    /// Numeric view of the value, if it has one.
    ///
    /// Timestamps are expressed as epoch milliseconds and booleans as 0/1.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bytes(b) => Some(*b as f64),
            Self::Timestamp(ts) => Some(ts.timestamp_millis() as f64),
            Self::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Whether the value reads as "on".
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(flag) => *flag,
            Self::Number(n) => *n != 0.0,
            Self::Bytes(b) => *b != 0,
            Self::Timestamp(_) => true,
            other => !other.is_empty(),
        }
    }

    /// Human-readable rendering used by grid cells and exports.
    pub fn display_text(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Bool(flag) => String::from(if *flag { "Yes" } else { "No" }),
            Self::Number(n) => format_number(*n),
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(", "),
            Self::Tags(tags) => tags
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(", "),
            Self::Object(map) if map.is_empty() => String::new(),
            Self::Object(map) => Value::Object(map.clone()).to_string(),
            Self::Bytes(bytes) => format_bytes(*bytes),
            Self::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Individual values that may be matched by exact filters and listed as
    /// filter options. Lists contribute each element; tags contribute `key=value`.
    pub fn option_values(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Tags(tags) => tags
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect(),
            other if other.is_empty() => Vec::new(),
            other => vec![other.display_text()],
        }
    }

    /// JSON form that normalizes back to the same value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Text(text) => Value::String(text.clone()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Self::Tags(tags) => Value::Object(
                tags.iter()
                    .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                    .collect(),
            ),
            Self::Object(map) => Value::Object(map.clone()),
            Self::Bytes(bytes) => Value::from(*bytes),
            Self::Timestamp(ts) => Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

/// Render a number without a trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Render a byte count with binary units, e.g. `59.28 TB`.
pub fn format_bytes(bytes: u64) -> String {
    for (unit, factor) in BYTE_UNITS {
        if bytes >= factor {
            return format!("{:.2} {unit}", bytes as f64 / factor as f64);
        }
    }
    format!("{bytes} B")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_booleans_as_yes_no() {
        assert_eq!(FieldValue::Bool(true).display_text(), "Yes");
        assert_eq!(FieldValue::Bool(false).display_text(), "No");
    }

    #[test]
    fn display_absent_as_empty() {
        assert_eq!(FieldValue::Absent.display_text(), "");
        assert!(FieldValue::Absent.is_empty());
    }

    #[test]
    fn display_numbers() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.5), "-3.5");
        assert_eq!(FieldValue::Number(0.0).display_text(), "0");
    }

    #[test]
    fn display_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1 << 40), "1.00 TB");
    }

    #[test]
    fn display_tags_sorted_by_key() {
        let tags = BTreeMap::from([
            ("Name".to_string(), "db-1".to_string()),
            ("Env".to_string(), "prod".to_string()),
        ]);
        assert_eq!(FieldValue::Tags(tags).display_text(), "Env=prod, Name=db-1");
    }

    #[test]
    fn display_timestamp_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            FieldValue::Timestamp(ts).display_text(),
            "2024-03-01T12:30:00Z"
        );
    }

    #[test]
    fn numeric_views() {
        assert_eq!(FieldValue::Bytes(10).as_number(), Some(10.0));
        assert_eq!(FieldValue::Bool(true).as_number(), Some(1.0));
        assert_eq!(FieldValue::Text("5".into()).as_number(), None);
    }

    #[test]
    fn option_values_flatten_lists() {
        let list = FieldValue::List(vec!["a".into(), "b".into()]);
        assert_eq!(list.option_values(), vec!["a", "b"]);
        assert!(FieldValue::Text(String::new()).option_values().is_empty());
    }

    #[test]
    fn value_serializes_tagged() {
        let json = serde_json::to_value(FieldValue::Bytes(7)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "Bytes", "value": 7}));
    }
}
