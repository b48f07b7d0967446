//! Catalog-wide checks and normalization of collector-shaped records.

use std::collections::BTreeSet;

use grid_catalog::{CatalogRegistry, Category, envelope};
use grid_model::{FieldValue, FilterKind, FlagSource, RawRecord};
use grid_normalize::Normalizer;
use serde_json::json;

fn raw(value: serde_json::Value) -> RawRecord {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn catalog_covers_every_collected_type() {
    let registry = CatalogRegistry::shared();
    let expected = [
        "AMI",
        "AutoScalingGroup",
        "BackupPlan",
        "BackupVault",
        "ClassicLoadBalancer",
        "DirectConnectConnection",
        "DirectConnectVirtualInterface",
        "EBSSnapshot",
        "EBSVolume",
        "EC2Instance",
        "EFSFileSystem",
        "ElasticIP",
        "FSxFileSystem",
        "InternetGateway",
        "LoadBalancer",
        "NATGateway",
        "NetworkACL",
        "RDSClusterSnapshot",
        "RDSInstance",
        "RDSSnapshot",
        "RouteTable",
        "S3Bucket",
        "SecurityGroup",
        "Subnet",
        "TransitGateway",
        "TransitGatewayAttachment",
        "VPC",
        "VPCEndpoint",
        "VPCPeeringConnection",
        "VPNConnection",
    ];
    let actual: BTreeSet<&str> = registry.resource_types().collect();
    assert_eq!(actual, expected.into_iter().collect());
    assert_eq!(registry.len(), expected.len());
}

#[test]
fn every_schema_is_well_formed() {
    for entry in CatalogRegistry::shared().entries() {
        let schema = &entry.schema;
        let rt = &schema.resource_type;

        assert!(!schema.required_keys().is_empty(), "{rt} has no identity column");
        for key in [
            envelope::ACCOUNT_ID,
            envelope::ACCOUNT_NAME,
            envelope::REGION,
            envelope::TAGS,
            envelope::LAST_UPDATED,
        ] {
            assert!(schema.has_field(key), "{rt} is missing envelope field {key}");
        }

        let keys: Vec<&str> = schema.keys().collect();
        let unique: BTreeSet<&str> = keys.iter().copied().collect();
        assert_eq!(keys.len(), unique.len(), "{rt} declares a key twice");

        let filter_keys: BTreeSet<&str> =
            schema.filters.iter().map(|filter| filter.key.as_str()).collect();
        assert_eq!(filter_keys.len(), schema.filters.len(), "{rt} repeats a filter");

        for filter in &schema.filters {
            match &filter.kind {
                FilterKind::Exact { field } => {
                    assert!(schema.has_field(field), "{rt}: exact filter on {field}");
                }
                FilterKind::Flag(FlagSource::NonEmpty(field) | FlagSource::Truthy(field)) => {
                    assert!(schema.has_field(field), "{rt}: flag filter on {field}");
                }
                _ => {}
            }
        }

        assert!(
            schema.default_visible_keys().is_superset(&schema.required_keys()),
            "{rt}: required column hidden by default"
        );
    }
}

#[test]
fn categories_partition_the_catalog() {
    let registry = CatalogRegistry::shared();
    let total: usize = Category::ALL
        .into_iter()
        .map(|category| registry.by_category(category).count())
        .sum();
    assert_eq!(total, registry.len());
    assert_eq!(registry.by_category(Category::Networking).count(), 17);
}

#[test]
fn ec2_record_from_collector_normalizes() {
    let schema = CatalogRegistry::shared().get("EC2Instance").unwrap();
    let record = Normalizer::new(&schema).normalize(&raw(json!({
        "accountId": "123456789012",
        "accountName": "platform-prod",
        "region": "eu-west-1",
        "instanceId": "i-0abc",
        "instanceName": "N/A",
        "instanceType": "t3.large",
        "instanceState": "running",
        "healthChecksPassed": 2,
        "healthChecksTotal": "2",
        "swoBackup": "daily",
        "ramUtilization": "71.5",
        "instancePrivateIps": "[\"10.0.1.12\", \"10.0.1.13\"]",
        "isWindows": "false",
        "createdAt": "2024-05-01T10:00:00+00:00",
        "tags": "[{\"Key\": \"Name\", \"Value\": \"web-1\"}]",
    })));

    let name = schema.get("instanceName").unwrap();
    assert_eq!(name.render(&record), "web-1");
    assert_eq!(schema.get("healthChecksTotal").unwrap().render(&record), "2/2");
    assert_eq!(schema.get("ramUtilization").unwrap().render(&record), "71.5%");
    assert_eq!(schema.get("diskUtilization").unwrap().render(&record), "");
    assert_eq!(
        record.get("instancePrivateIps"),
        &FieldValue::List(vec!["10.0.1.12".into(), "10.0.1.13".into()])
    );
    assert_eq!(record.get("isWindows"), &FieldValue::Bool(false));
    assert!(record.get("createdAt").as_timestamp().is_some());
}

#[test]
fn s3_human_sizes_are_canonical_bytes() {
    let schema = CatalogRegistry::shared().get("s3bucket").unwrap();
    let record = Normalizer::new(&schema).normalize(&raw(json!({
        "bucketName": "logs",
        "storageBytes": "59.28 TB",
        "objectCount": "1,200",
        "hasLifecycleRules": true,
    })));
    assert!(matches!(record.get("storageBytes"), FieldValue::Bytes(b) if *b > 59 << 40));
    assert_eq!(record.get("objectCount"), &FieldValue::Number(1200.0));
    assert_eq!(schema.get("storageBytes").unwrap().render(&record), "59.28 TB");
}

#[test]
fn backup_plan_schedules_from_collector() {
    let schema = CatalogRegistry::shared().get("BackupPlan").unwrap();
    let record = Normalizer::new(&schema).normalize(&raw(json!({
        "backupPlanId": "plan-1",
        "schedules": ["cron(0 5 * * ? *)"],
        "selectionResourceTypes": [],
        "lastExecutionDate": null,
    })));
    assert_eq!(
        record.get("schedules"),
        &FieldValue::List(vec!["cron(0 5 * * ? *)".into()])
    );
    assert_eq!(record.get("selectionResourceTypes"), &FieldValue::List(vec![]));
    assert!(record.get("lastExecutionDate").is_absent());
}
