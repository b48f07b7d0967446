//! Raw and normalized records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::FieldValue;

/// Untyped record as received from the resource store.
pub type RawRecord = Map<String, Value>;

static ABSENT: FieldValue = FieldValue::Absent;

/// Record after shape unification.
///
/// Every key declared by the schema is present; lookups of undeclared keys
/// yield [`FieldValue::Absent`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl NormalizedRecord {
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    /// Field value, or `Absent` for undeclared keys.
    pub fn get(&self, key: &str) -> &FieldValue {
        self.fields.get(key).unwrap_or(&ABSENT)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display text of a field.
    pub fn text(&self, key: &str) -> String {
        self.get(key).display_text()
    }

    /// Convert back into a raw record that normalizes to `self`.
    pub fn to_raw(&self) -> RawRecord {
        self.fields
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect()
    }
}

impl FromIterator<(String, FieldValue)> for NormalizedRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
