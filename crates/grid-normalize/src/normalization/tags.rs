//! Tag decoding.
//!
//! Tags arrive as `[{"Key": .., "Value": ..}]` (also lowercase keys), as a
//! plain `{name: value}` object, or as a JSON string of either.

use std::collections::BTreeMap;

use grid_model::is_placeholder;
use serde_json::Value;

use super::{Decoded, json_type, stringify};

pub fn decode_tag_map(value: &Value) -> Decoded<BTreeMap<String, String>> {
    match value {
        Value::Null => Decoded::Missing,
        Value::Array(items) => Decoded::Value(items.iter().filter_map(tag_pair).collect()),
        Value::Object(map) => Decoded::Value(
            map.iter()
                .filter(|(key, _)| !key.trim().is_empty())
                .map(|(key, value)| (key.clone(), stringify(value)))
                .collect(),
        ),
        Value::String(text) if is_placeholder(text) => Decoded::Missing,
        Value::String(text) => match serde_json::from_str::<Value>(text.trim()) {
            Ok(parsed @ (Value::Array(_) | Value::Object(_))) => decode_tag_map(&parsed),
            _ => Decoded::Malformed("tag string is not a JSON array or object".to_string()),
        },
        other => Decoded::Malformed(format!("unexpected {} for tags", json_type(other))),
    }
}

/// One `{Key, Value}` pair; pairs without a usable key are skipped.
fn tag_pair(item: &Value) -> Option<(String, String)> {
    let pair = item.as_object()?;
    let key = pair.get("Key").or_else(|| pair.get("key"))?.as_str()?;
    if key.trim().is_empty() {
        return None;
    }
    let value = pair
        .get("Value")
        .or_else(|| pair.get("value"))
        .map(stringify)
        .unwrap_or_default();
    Some((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> BTreeMap<String, String> {
        decode_tag_map(&value).ok().unwrap_or_default()
    }

    #[test]
    fn pair_list_string() {
        let tags = decode(json!(r#"[{"Key":"Name","Value":"db-1"}]"#));
        assert_eq!(tags, BTreeMap::from([("Name".into(), "db-1".into())]));
    }

    #[test]
    fn lowercase_pairs_and_plain_objects() {
        let pairs = decode(json!([{"key": "env", "value": "prod"}]));
        let plain = decode(json!({"env": "prod"}));
        assert_eq!(pairs, plain);
    }

    #[test]
    fn non_string_values_are_rendered() {
        let tags = decode(json!([{"Key": "replicas", "Value": 3}, {"Key": "owner"}]));
        assert_eq!(tags["replicas"], "3");
        assert_eq!(tags["owner"], "");
    }

    #[test]
    fn pairs_without_key_are_skipped() {
        let tags = decode(json!([{"Value": "orphan"}, {"Key": "", "Value": "x"}, "junk"]));
        assert!(tags.is_empty());
    }

    #[test]
    fn malformed_string() {
        assert!(decode_tag_map(&json!("Name=db-1")).is_malformed());
        assert!(decode_tag_map(&json!(17)).is_malformed());
        assert_eq!(decode_tag_map(&json!("N/A")), Decoded::Missing);
    }
}
