//! Scalar text and nested-object decoding.

use grid_model::is_placeholder;
use serde_json::{Map, Value};

use super::{Decoded, json_type};

/// Strings are kept verbatim (placeholders included); other values are
/// stringified, structures as compact JSON.
pub fn decode_scalar(value: &Value) -> Decoded<String> {
    match value {
        Value::Null => Decoded::Missing,
        Value::String(text) => Decoded::Value(text.clone()),
        other => Decoded::Value(other.to_string()),
    }
}

pub fn decode_nested(value: &Value) -> Decoded<Map<String, Value>> {
    match value {
        Value::Null => Decoded::Missing,
        Value::Object(map) => Decoded::Value(map.clone()),
        Value::String(text) if is_placeholder(text) => Decoded::Missing,
        Value::String(text) => match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::Object(map)) => Decoded::Value(map),
            _ => Decoded::Malformed("string is not a JSON object".to_string()),
        },
        other => Decoded::Malformed(format!("unexpected {} for object", json_type(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert_eq!(decode_scalar(&json!("N/A")), Decoded::Value("N/A".into()));
        assert_eq!(decode_scalar(&json!(8)), Decoded::Value("8".into()));
        assert_eq!(decode_scalar(&json!(["a"])), Decoded::Value("[\"a\"]".into()));
        assert_eq!(decode_scalar(&Value::Null), Decoded::Missing);
    }

    #[test]
    fn nested_from_string() {
        let decoded = decode_nested(&json!("{\"Enabled\": true}")).ok().unwrap();
        assert_eq!(decoded.get("Enabled"), Some(&json!(true)));
        assert!(decode_nested(&json!("[1]")).is_malformed());
    }
}
