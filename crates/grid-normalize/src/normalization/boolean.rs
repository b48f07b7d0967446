//! Boolean decoding.

use grid_model::is_placeholder;
use serde_json::Value;

use super::{Decoded, json_type};

/// Parse a boolean token (case-insensitive).
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "enabled" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "disabled" | "off" => Some(false),
        _ => None,
    }
}

pub fn decode_bool(value: &Value) -> Decoded<bool> {
    match value {
        Value::Null => Decoded::Missing,
        Value::Bool(flag) => Decoded::Value(*flag),
        Value::Number(number) => match number.as_f64() {
            Some(n) => Decoded::Value(n != 0.0),
            None => Decoded::Malformed(format!("{number} is not a flag")),
        },
        Value::String(text) => match parse_bool(text) {
            Some(flag) => Decoded::Value(flag),
            None if is_placeholder(text) => Decoded::Missing,
            None => Decoded::Malformed(format!("'{text}' is not a boolean")),
        },
        other => Decoded::Malformed(format!("unexpected {} for boolean", json_type(other))),
    }
}
