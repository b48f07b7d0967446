//! Per-kind decoders.
//!
//! Each decoder takes one raw JSON value and reports one of three outcomes via
//! [`Decoded`]. Mapping an outcome onto a canonical
//! [`FieldValue`](grid_model::FieldValue) is the normalizer's job.

pub mod boolean;
pub mod datetime;
pub mod list;
pub mod numeric;
pub mod size;
pub mod tags;
pub mod text;

use serde_json::Value;

pub use boolean::{decode_bool, parse_bool};
pub use datetime::{decode_timestamp, parse_timestamp};
pub use list::{PRIORITY_ID_KEYS, decode_string_list, split_delimited};
pub use numeric::{decode_number, parse_numeric};
pub use size::{decode_byte_size, parse_byte_size};
pub use tags::decode_tag_map;
pub use text::{decode_nested, decode_scalar};

/// Outcome of decoding one raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Value(T),
    /// Null, missing, or a placeholder token. Benign.
    Missing,
    /// Present but unusable; carries the reason for diagnostics.
    Malformed(String),
}

impl<T> Decoded<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        match self {
            Self::Value(value) => Decoded::Value(f(value)),
            Self::Missing => Decoded::Missing,
            Self::Malformed(reason) => Decoded::Malformed(reason),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Missing | Self::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

/// JSON type name for diagnostics.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Stringify a non-string JSON value the way lists and tags do.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
