//! Human byte-size strings such as `59.28 TB`.

use grid_model::is_placeholder;
use serde_json::Value;

use super::numeric::parse_numeric;
use super::{Decoded, json_type};

/// Multiplier for a size unit (case-insensitive). An empty unit means bytes.
fn unit_factor(unit: &str) -> Option<u64> {
    let factor = match unit.to_ascii_uppercase().as_str() {
        "" | "B" | "BYTE" | "BYTES" => 1,
        "KB" | "KIB" => 1 << 10,
        "MB" | "MIB" => 1 << 20,
        "GB" | "GIB" => 1 << 30,
        "TB" | "TIB" => 1 << 40,
        "PB" | "PIB" => 1 << 50,
        _ => return None,
    };
    Some(factor)
}

/// Parse `<number> [unit]` into bytes. Space between number and unit is optional.
pub fn parse_byte_size(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    let number = trimmed.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let unit = &trimmed[number.len()..];

    let amount = parse_numeric(number)?;
    if amount < 0.0 {
        return None;
    }
    let factor = unit_factor(unit)?;
    Some((amount * factor as f64).round() as u64)
}

/// Decode a raw value declared as a byte size.
pub fn decode_byte_size(value: &Value) -> Decoded<u64> {
    match value {
        Value::Null => Decoded::Missing,
        Value::Number(number) => match number.as_u64() {
            Some(bytes) => Decoded::Value(bytes),
            None => match number.as_f64() {
                Some(n) if n.is_finite() && n >= 0.0 => Decoded::Value(n.round() as u64),
                _ => Decoded::Malformed(format!("{number} is not a byte count")),
            },
        },
        Value::String(text) if is_placeholder(text) => Decoded::Missing,
        Value::String(text) => match parse_byte_size(text) {
            Some(bytes) => Decoded::Value(bytes),
            None => Decoded::Malformed(format!("unrecognized size '{text}'")),
        },
        other => Decoded::Malformed(format!("unexpected {} for size", json_type(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_units() {
        assert_eq!(parse_byte_size("512"), Some(512));
        assert_eq!(parse_byte_size("1 KB"), Some(1024));
        assert_eq!(parse_byte_size("1.5mb"), Some(1_572_864));
        assert_eq!(parse_byte_size("2 GB"), Some(2 << 30));
    }

    #[test]
    fn parses_collector_output() {
        let expected = (59.28 * (1u64 << 40) as f64).round() as u64;
        assert_eq!(parse_byte_size("59.28 TB"), Some(expected));
    }

    #[test]
    fn rejects_unknown_units() {
        assert_eq!(parse_byte_size("12 parsecs"), None);
        assert_eq!(parse_byte_size("-3 GB"), None);
        assert_eq!(parse_byte_size("GB"), None);
    }

    #[test]
    fn native_numbers_are_bytes() {
        assert_eq!(decode_byte_size(&json!(4096)), Decoded::Value(4096));
        assert!(decode_byte_size(&json!(-1)).is_malformed());
    }

    #[test]
    fn placeholder_is_missing() {
        assert_eq!(decode_byte_size(&json!("N/A")), Decoded::Missing);
    }
}
