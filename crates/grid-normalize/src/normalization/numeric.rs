//! Numeric-from-string decoding.

use grid_model::is_placeholder;
use serde_json::Value;

use super::{Decoded, json_type};

/// Parse a string value to a finite number.
///
/// Handles common numeric formats:
/// - Standard numbers: "123", "-45.67"
/// - Thousands separators: "1,234,567"
/// - Whitespace: "  123  "
/// - Scientific notation: "1.23e5"
///
/// Returns None for unparseable or non-finite input (`nan`, `inf`).
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return None;
    }

    // Remove thousands separators and whitespace
    let cleaned = trimmed
        .replace(',', "")
        .replace(' ', "")
        .replace('\u{a0}', ""); // Non-breaking space

    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Decode a raw value declared as a number.
pub fn decode_number(value: &Value) -> Decoded<f64> {
    match value {
        Value::Null => Decoded::Missing,
        Value::Number(number) => match number.as_f64() {
            Some(n) if n.is_finite() => Decoded::Value(n),
            _ => Decoded::Malformed(format!("non-finite number {number}")),
        },
        Value::String(text) if is_placeholder(text) => Decoded::Missing,
        Value::String(text) => match parse_numeric(text) {
            Some(n) => Decoded::Value(n),
            None => Decoded::Malformed(format!("'{text}' is not a number")),
        },
        other => Decoded::Malformed(format!("unexpected {} for number", json_type(other))),
    }
}
