//! End-to-end normalization over collector-shaped records.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use grid_model::{FieldDescriptor, FieldValue, GridSchema, RawRecord};
use grid_normalize::{Normalizer, normalize};
use proptest::prelude::*;
use serde_json::{Value, json};

fn rds_schema() -> GridSchema {
    GridSchema::new("RDSSnapshot", "RDS Snapshots")
        .field(FieldDescriptor::text("snapshotId", "Snapshot ID").required())
        .field(FieldDescriptor::number("allocatedStorage", "Storage (GiB)"))
        .field(FieldDescriptor::bytes("storageBytes", "Storage"))
        .field(FieldDescriptor::boolean("encrypted", "Encrypted"))
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .field(FieldDescriptor::list("securityGroups", "Security Groups", &["GroupId"]))
        .field(FieldDescriptor::tags("tags", "Tags"))
        .field(FieldDescriptor::nested("backupRetention", "Retention"))
}

fn raw(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn tag_pair_string_becomes_map() {
    let record = normalize(
        &rds_schema(),
        &raw(json!({"tags": r#"[{"Key":"Name","Value":"db-1"}]"#})),
    );
    assert_eq!(
        record.get("tags"),
        &FieldValue::Tags(BTreeMap::from([("Name".to_string(), "db-1".to_string())]))
    );
}

#[test]
fn collector_record_normalizes_every_kind() {
    let record = normalize(
        &rds_schema(),
        &raw(json!({
            "snapshotId": "rds:db-1-2024-05-01",
            "allocatedStorage": "1,024",
            "storageBytes": "1.5 GB",
            "encrypted": "Yes",
            "createdAt": "2024-05-01T03:00:00+00:00",
            "securityGroups": "[{\"GroupId\": \"sg-1\"}, {\"GroupId\": \"sg-2\"}]",
            "tags": {"env": "prod"},
            "backupRetention": "{\"days\": 7}"
        })),
    );

    assert_eq!(record.get("allocatedStorage"), &FieldValue::Number(1024.0));
    assert_eq!(record.get("storageBytes"), &FieldValue::Bytes(1_610_612_736));
    assert_eq!(record.get("encrypted"), &FieldValue::Bool(true));
    assert_eq!(
        record.get("createdAt"),
        &FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 3, 0, 0).unwrap())
    );
    assert_eq!(record.text("securityGroups"), "sg-1, sg-2");
    assert_eq!(record.text("tags"), "env=prod");
    assert_eq!(record.text("backupRetention"), "{\"days\":7}");
}

#[test]
fn placeholders_are_absent_for_typed_kinds() {
    let record = normalize(
        &rds_schema(),
        &raw(json!({
            "snapshotId": "N/A",
            "allocatedStorage": "N/A",
            "createdAt": "None",
            "securityGroups": "N/A",
            "tags": "N/A"
        })),
    );
    assert_eq!(record.text("snapshotId"), "N/A");
    assert!(record.get("allocatedStorage").is_absent());
    assert!(record.get("createdAt").is_absent());
    assert!(record.get("securityGroups").is_empty());
    assert!(record.get("tags").is_empty());
}

#[test]
fn batch_report_counts_malformed_fields() {
    let records = vec![
        raw(json!({"snapshotId": "a", "tags": "Name=x", "createdAt": "someday"})),
        raw(json!({"snapshotId": "b"})),
    ];
    let (normalized, report) = Normalizer::new(&rds_schema()).normalize_all(&records);
    assert_eq!(normalized.len(), 2);
    assert_eq!(report.records, 2);
    assert_eq!(report.malformed, 2);
    assert!(normalized[0].get("tags").is_empty());
}

// =============================================================================
// PROPERTIES
// =============================================================================

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000i64..1_000_000_000_000i64).prop_map(Value::from),
        (-1.0e6f64..1.0e6f64).prop_map(Value::from),
        "[ a-zA-Z0-9,;:._=-]{0,12}".prop_map(Value::String),
        prop::sample::select(vec![
            "N/A",
            "None",
            "59.28 TB",
            "1,024",
            "2024-05-01T03:00:00Z",
            "2024-05-01",
            "yes",
            "[\"a\", \"b\"]",
            "[{\"Key\":\"Name\",\"Value\":\"db-1\"}]",
            "{\"GroupId\": \"sg-1\"}",
            "[1, [2, {\"id\": 3}]]",
        ])
        .prop_map(|text| Value::String(text.to_string())),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("(Key|Value|id|GroupId|[a-z]{1,4})", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn raw_record() -> impl Strategy<Value = RawRecord> {
    let keys: Vec<String> = rds_schema().keys().map(str::to_string).collect();
    prop::collection::vec(prop::option::of(json_value()), keys.len()).prop_map(move |values| {
        keys.iter()
            .zip(values)
            .filter_map(|(key, value)| value.map(|value| (key.clone(), value)))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(raw in raw_record()) {
        let schema = rds_schema();
        let once = normalize(&schema, &raw);
        let twice = normalize(&schema, &once.to_raw());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_every_declared_key_present(raw in raw_record()) {
        let schema = rds_schema();
        let record = normalize(&schema, &raw);
        for key in schema.keys() {
            prop_assert!(record.contains_key(key));
        }
    }
}
