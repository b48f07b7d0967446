//! RDS instances and manual snapshots.

use grid_model::{FieldDescriptor, FilterDescriptor, FlagSource, GridSchema};

use crate::envelope::{name_field, with_envelope, with_unit};

pub(crate) fn schemas() -> Vec<GridSchema> {
    vec![rds_instance(), rds_snapshot(), rds_cluster_snapshot()]
}

pub fn rds_instance() -> GridSchema {
    let schema = GridSchema::new("RDSInstance", "RDS Instances")
        .field(
            FieldDescriptor::text("dbInstanceId", "Instance ID")
                .required()
                .searchable(),
        )
        .field(name_field("dbInstanceName", "Database"))
        .field(FieldDescriptor::text("engine", "Engine"))
        .field(FieldDescriptor::text("engineVersion", "Version"))
        .field(FieldDescriptor::text("status", "Status"))
        .field(FieldDescriptor::text("instanceClass", "Class"))
        .field(FieldDescriptor::text("storageType", "Storage Type").hidden())
        .field(with_unit("allocatedStorage", "Storage", " GiB"))
        .field(FieldDescriptor::boolean("multiAZ", "Multi-AZ"))
        .field(
            FieldDescriptor::boolean("performanceInsightsEnabled", "Performance Insights")
                .hidden(),
        )
        .field(FieldDescriptor::text("dbInstanceArn", "ARN").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("engine", "Engine"))
        .filter(FilterDescriptor::exact("status", "Status"))
        .filter(FilterDescriptor::flag(
            "multiAZ",
            "Multi-AZ",
            FlagSource::Truthy("multiAZ".into()),
        ));
    with_envelope(schema)
}

/// Columns shared by instance and cluster snapshots; `source` names the
/// field holding the instance or cluster the snapshot was taken from.
fn snapshot_schema(
    resource_type: &str,
    title: &str,
    source: &'static str,
    source_label: &str,
) -> GridSchema {
    let schema = GridSchema::new(resource_type, title)
        .field(
            FieldDescriptor::text("snapshotId", "Snapshot ID")
                .required()
                .searchable(),
        )
        .field(name_field("snapshotName", "Name"))
        .field(FieldDescriptor::text(source, source_label).searchable())
        .field(FieldDescriptor::text("status", "Status"))
        .field(FieldDescriptor::text("engine", "Engine"))
        .field(FieldDescriptor::text("snapshotType", "Type").hidden())
        .field(with_unit("allocatedStorage", "Storage", " GiB"))
        .field(FieldDescriptor::boolean("encrypted", "Encrypted"))
        .field(FieldDescriptor::text("snapshotArn", "ARN").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("engine", "Engine"))
        .filter(FilterDescriptor::exact("status", "Status"))
        .filter(FilterDescriptor::flag(
            "encrypted",
            "Encrypted",
            FlagSource::Truthy("encrypted".into()),
        ));
    with_envelope(schema)
}

pub fn rds_snapshot() -> GridSchema {
    snapshot_schema("RDSSnapshot", "RDS Snapshots", "instanceId", "DB Instance")
}

pub fn rds_cluster_snapshot() -> GridSchema {
    snapshot_schema(
        "RDSClusterSnapshot",
        "RDS Cluster Snapshots",
        "clusterId",
        "DB Cluster",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshots_differ_only_in_source_column() {
        let instance = rds_snapshot();
        let cluster = rds_cluster_snapshot();
        assert!(instance.has_field("instanceId"));
        assert!(!instance.has_field("clusterId"));
        assert!(cluster.has_field("clusterId"));
        assert_eq!(instance.fields.len(), cluster.fields.len());
    }
}
