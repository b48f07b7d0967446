//! Schema-driven record normalization.

use std::fmt;

use grid_model::{
    FieldDescriptor, FieldValue, GridSchema, NormalizedRecord, RawRecord, ValueKind,
};
use serde_json::{Map, Value};

use crate::normalization::{
    Decoded, decode_bool, decode_byte_size, decode_nested, decode_number, decode_scalar,
    decode_string_list, decode_tag_map, decode_timestamp,
};

/// Diagnostics produced while normalizing a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub records: usize,
    /// Fields that were present but unusable and fell back to a default.
    pub malformed: usize,
    /// Fields that were missing, null, or a placeholder.
    pub missing: usize,
}

impl NormalizeReport {
    /// Number of diagnostics emitted.
    pub fn diagnostics(&self) -> usize {
        self.malformed + self.missing
    }

    pub fn merge(&mut self, other: &Self) {
        self.records += other.records;
        self.malformed += other.malformed;
        self.missing += other.missing;
    }
}

impl fmt::Display for NormalizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, {} malformed fields, {} missing fields",
            self.records, self.malformed, self.missing
        )
    }
}

/// Normalizes raw records against one schema.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    schema: &'a GridSchema,
}

impl<'a> Normalizer<'a> {
    pub fn new(schema: &'a GridSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a GridSchema {
        self.schema
    }

    /// Normalize one record. Every declared key is present in the result.
    pub fn normalize(&self, raw: &RawRecord) -> NormalizedRecord {
        let mut report = NormalizeReport::default();
        self.normalize_with(raw, &mut report)
    }

    /// Normalize a batch, counting diagnostics.
    pub fn normalize_all(&self, raws: &[RawRecord]) -> (Vec<NormalizedRecord>, NormalizeReport) {
        let mut report = NormalizeReport::default();
        let records = raws
            .iter()
            .map(|raw| self.normalize_with(raw, &mut report))
            .collect();
        tracing::debug!(
            resource_type = %self.schema.resource_type,
            records = report.records,
            malformed = report.malformed,
            missing = report.missing,
            "normalized batch"
        );
        (records, report)
    }

    fn normalize_with(&self, raw: &RawRecord, report: &mut NormalizeReport) -> NormalizedRecord {
        report.records += 1;
        self.schema
            .fields
            .iter()
            .map(|field| {
                let value = match lookup(raw, &field.key) {
                    Some(value) => self.decode(field, value, report),
                    None => {
                        self.note_missing(field, report);
                        missing_value(&field.kind)
                    }
                };
                (field.key.clone(), value)
            })
            .collect()
    }

    fn decode(
        &self,
        field: &FieldDescriptor,
        value: &Value,
        report: &mut NormalizeReport,
    ) -> FieldValue {
        let decoded = match &field.kind {
            ValueKind::Scalar => decode_scalar(value).map(FieldValue::Text),
            ValueKind::Number => decode_number(value).map(FieldValue::Number),
            ValueKind::ByteSize => decode_byte_size(value).map(FieldValue::Bytes),
            ValueKind::Boolean => decode_bool(value).map(FieldValue::Bool),
            ValueKind::Timestamp => decode_timestamp(value).map(FieldValue::Timestamp),
            ValueKind::StringList { id_aliases } => {
                decode_string_list(value, id_aliases).map(FieldValue::List)
            }
            ValueKind::TagMap => decode_tag_map(value).map(FieldValue::Tags),
            ValueKind::Nested => decode_nested(value).map(FieldValue::Object),
        };

        match decoded {
            Decoded::Value(value) => value,
            Decoded::Missing => {
                self.note_missing(field, report);
                missing_value(&field.kind)
            }
            Decoded::Malformed(reason) => {
                report.malformed += 1;
                if field.kind == ValueKind::TagMap {
                    tracing::debug!(
                        resource_type = %self.schema.resource_type,
                        field = %field.key,
                        %reason,
                        "ignoring malformed tags"
                    );
                } else {
                    tracing::warn!(
                        resource_type = %self.schema.resource_type,
                        field = %field.key,
                        kind = field.kind.name(),
                        %reason,
                        "malformed field value, using default"
                    );
                }
                malformed_value(&field.kind)
            }
        }
    }

    fn note_missing(&self, field: &FieldDescriptor, report: &mut NormalizeReport) {
        report.missing += 1;
        tracing::debug!(
            resource_type = %self.schema.resource_type,
            field = %field.key,
            "field absent"
        );
    }
}

/// Normalize one record against a schema.
pub fn normalize(schema: &GridSchema, raw: &RawRecord) -> NormalizedRecord {
    Normalizer::new(schema).normalize(raw)
}

/// Exact key first, then a case-insensitive match.
fn lookup<'r>(raw: &'r RawRecord, key: &str) -> Option<&'r Value> {
    raw.get(key).or_else(|| {
        raw.iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })
}

/// Canonical value for null, missing or placeholder input.
fn missing_value(kind: &ValueKind) -> FieldValue {
    match kind {
        ValueKind::Scalar => FieldValue::Text(String::new()),
        ValueKind::Boolean => FieldValue::Bool(false),
        ValueKind::StringList { .. } => FieldValue::List(Vec::new()),
        ValueKind::TagMap => FieldValue::Tags(Default::default()),
        ValueKind::Nested => FieldValue::Object(Map::new()),
        ValueKind::Number | ValueKind::ByteSize | ValueKind::Timestamp => FieldValue::Absent,
    }
}

/// Canonical value for present but unusable input.
fn malformed_value(kind: &ValueKind) -> FieldValue {
    match kind {
        ValueKind::ByteSize => FieldValue::Bytes(0),
        other => missing_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> GridSchema {
        GridSchema::new("S3Bucket", "S3 Buckets")
            .field(FieldDescriptor::text("bucketName", "Bucket").required())
            .field(FieldDescriptor::bytes("storageBytes", "Storage"))
            .field(FieldDescriptor::number("objectCount", "Objects"))
            .field(FieldDescriptor::boolean("hasLifecycleRules", "Lifecycle"))
            .field(FieldDescriptor::tags("tags", "Tags"))
    }

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => RawRecord::new(),
        }
    }

    #[test]
    fn every_declared_key_is_present() {
        let record = normalize(&schema(), &RawRecord::new());
        assert_eq!(record.len(), 5);
        assert_eq!(record.get("bucketName"), &FieldValue::Text(String::new()));
        assert!(record.get("objectCount").is_absent());
        assert_eq!(record.get("hasLifecycleRules"), &FieldValue::Bool(false));
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let record = normalize(&schema(), &raw(json!({"extra": 1, "bucketName": "logs"})));
        assert!(!record.contains_key("extra"));
    }

    #[test]
    fn unparseable_size_is_zero_and_counted() {
        let (records, report) = Normalizer::new(&schema())
            .normalize_all(&[raw(json!({"storageBytes": "lots", "objectCount": "N/A"}))]);
        assert_eq!(records[0].get("storageBytes"), &FieldValue::Bytes(0));
        assert!(records[0].get("objectCount").is_absent());
        assert_eq!(report.records, 1);
        assert_eq!(report.malformed, 1);
    }

    #[test]
    fn keys_match_case_insensitively() {
        let record = normalize(&schema(), &raw(json!({"Tags": {"env": "prod"}})));
        assert_eq!(record.get("tags").display_text(), "env=prod");
    }

    #[test]
    fn report_counts_accumulate() {
        let mut total = NormalizeReport::default();
        total.merge(&NormalizeReport {
            records: 2,
            malformed: 1,
            missing: 3,
        });
        assert_eq!(total.diagnostics(), 4);
        assert_eq!(total.to_string(), "2 records, 1 malformed fields, 3 missing fields");
    }
}
