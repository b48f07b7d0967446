//! String-list decoding.
//!
//! Accepted shapes, tried in order:
//! 1. a native array (nested arrays flattened, objects contribute their id)
//! 2. a single object with an identifier
//! 3. a JSON string of any of the above
//! 4. a `,` / `;` delimited string

use grid_model::is_placeholder;
use serde_json::{Map, Value};

use super::{Decoded, json_type};

/// Identifier keys tried before a field's own aliases.
pub const PRIORITY_ID_KEYS: [&str; 2] = ["id", "resourceId"];

/// Split a delimited string into trimmed, non-placeholder items.
pub fn split_delimited(text: &str) -> Vec<String> {
    text.split([',', ';'])
        .map(str::trim)
        .filter(|item| !is_placeholder(item))
        .map(str::to_string)
        .collect()
}

pub fn decode_string_list(value: &Value, aliases: &[String]) -> Decoded<Vec<String>> {
    match value {
        Value::Null => Decoded::Missing,
        Value::Array(_) => {
            let mut items = Vec::new();
            flatten_into(value, aliases, &mut items);
            Decoded::Value(items)
        }
        Value::Object(map) => match object_id(map, aliases) {
            Some(id) => Decoded::Value(vec![id]),
            None => Decoded::Malformed("object has no identifier".to_string()),
        },
        Value::String(text) => decode_list_text(text, aliases),
        Value::Number(number) => Decoded::Value(vec![number.to_string()]),
        Value::Bool(flag) => Decoded::Value(vec![flag.to_string()]),
    }
}

fn decode_list_text(text: &str, aliases: &[String]) -> Decoded<Vec<String>> {
    if is_placeholder(text) {
        return Decoded::Missing;
    }
    let trimmed = text.trim();
    if trimmed.starts_with(['[', '{', '"']) {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::String(inner)) => return Decoded::Value(split_delimited(&inner)),
            Ok(parsed @ (Value::Array(_) | Value::Object(_))) => {
                return decode_string_list(&parsed, aliases);
            }
            Ok(other) => {
                tracing::trace!(shape = json_type(&other), "list string parsed to a scalar");
            }
            Err(_) => {}
        }
    }
    Decoded::Value(split_delimited(trimmed))
}

fn flatten_into(value: &Value, aliases: &[String], items: &mut Vec<String>) {
    match value {
        Value::Array(elements) => {
            for element in elements {
                flatten_into(element, aliases, items);
            }
        }
        Value::String(text) => {
            let text = text.trim();
            if !is_placeholder(text) {
                items.push(text.to_string());
            }
        }
        Value::Number(number) => items.push(number.to_string()),
        Value::Bool(flag) => items.push(flag.to_string()),
        Value::Object(map) => {
            if let Some(id) = object_id(map, aliases) {
                items.push(id);
            }
        }
        Value::Null => {}
    }
}

/// First usable identifier among the priority keys and the field's aliases.
fn object_id(map: &Map<String, Value>, aliases: &[String]) -> Option<String> {
    PRIORITY_ID_KEYS
        .iter()
        .copied()
        .chain(aliases.iter().map(String::as_str))
        .find_map(|key| match map.get(key)? {
            Value::String(text) if !is_placeholder(text) => Some(text.trim().to_string()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Vec<String> {
        decode_string_list(&value, &["GroupId".to_string()])
            .ok()
            .unwrap_or_default()
    }

    #[test]
    fn native_array() {
        assert_eq!(decode(json!(["10.0.0.1", " 10.0.0.2 "])), ["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn nested_arrays_flatten() {
        assert_eq!(decode(json!([["a"], ["b", ["c"]]])), ["a", "b", "c"]);
    }

    #[test]
    fn objects_contribute_ids_by_priority() {
        let value = json!([{"GroupId": "sg-1"}, {"id": "x", "GroupId": "sg-2"}, {"Name": "n"}]);
        assert_eq!(decode(value), ["sg-1", "x"]);
    }

    #[test]
    fn single_object() {
        assert_eq!(decode(json!({"resourceId": "vol-1"})), ["vol-1"]);
        assert!(decode_string_list(&json!({"Name": "n"}), &[]).is_malformed());
    }

    #[test]
    fn json_string() {
        assert_eq!(decode(json!("[\"a\", \"b\"]")), ["a", "b"]);
        assert_eq!(decode(json!("{\"GroupId\": \"sg-9\"}")), ["sg-9"]);
    }

    #[test]
    fn delimited_string() {
        assert_eq!(decode(json!("a, b;c,,")), ["a", "b", "c"]);
    }

    #[test]
    fn broken_json_falls_back_to_split() {
        assert_eq!(decode(json!("[a, b")), ["[a", "b"]);
    }

    #[test]
    fn scalars_are_stringified() {
        assert_eq!(decode(json!([1, true, null])), ["1", "true"]);
    }

    #[test]
    fn duplicates_are_kept() {
        assert_eq!(decode(json!(["a", "a"])), ["a", "a"]);
    }

    #[test]
    fn placeholders_are_missing() {
        assert_eq!(decode_string_list(&json!("N/A"), &[]), Decoded::Missing);
        assert_eq!(decode(json!(["N/A", "x"])), ["x"]);
    }
}
