//! Block, object and file storage.

use grid_model::{BucketSource, FieldDescriptor, FilterDescriptor, FlagSource, GridSchema};

use crate::envelope::{name_field, with_envelope, with_unit};

pub(crate) fn schemas() -> Vec<GridSchema> {
    vec![ebs_volume(), s3_bucket(), efs_file_system(), fsx_file_system()]
}

pub fn ebs_volume() -> GridSchema {
    let schema = GridSchema::new("EBSVolume", "EBS Volumes")
        .field(FieldDescriptor::text("volumeId", "Volume ID").required().searchable())
        .field(name_field("volumeName", "Name"))
        .field(FieldDescriptor::text("volumeState", "State"))
        .field(FieldDescriptor::text("volumeType", "Type"))
        .field(with_unit("size", "Size", " GiB"))
        .field(FieldDescriptor::number("iops", "IOPS").hidden())
        .field(with_unit("throughput", "Throughput", " MiB/s").hidden())
        .field(FieldDescriptor::boolean("encrypted", "Encrypted"))
        .field(FieldDescriptor::boolean("multiAttachEnabled", "Multi-Attach").hidden())
        .field(
            FieldDescriptor::list(
                "attachedInstanceIds",
                "Attached To",
                &["instanceId", "InstanceId"],
            )
            .searchable(),
        )
        .field(FieldDescriptor::nested("metrics", "Metrics").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("volumeState", "State"))
        .filter(FilterDescriptor::exact("volumeType", "Type"))
        .filter(FilterDescriptor::flag(
            "encrypted",
            "Encrypted",
            FlagSource::Truthy("encrypted".into()),
        ))
        .filter(FilterDescriptor::bucket(
            "attachment",
            "Attachment",
            BucketSource::custom(|record, _now| {
                let attached = !record.get("attachedInstanceIds").is_empty();
                String::from(if attached { "attached" } else { "unattached" })
            }),
        ));
    with_envelope(schema)
}

pub fn s3_bucket() -> GridSchema {
    let schema = GridSchema::new("S3Bucket", "S3 Buckets")
        .field(FieldDescriptor::text("bucketName", "Bucket").required().searchable())
        .field(FieldDescriptor::text("bucketNameTag", "Name Tag").searchable())
        .field(FieldDescriptor::bytes("storageBytes", "Storage"))
        .field(FieldDescriptor::number("objectCount", "Objects"))
        .field(FieldDescriptor::boolean("hasLifecycleRules", "Lifecycle"))
        .field(FieldDescriptor::text("versioning", "Versioning"))
        .field(FieldDescriptor::text("encryption", "Encryption").hidden())
        .field(FieldDescriptor::text("publicAccessBlock", "Public Access Block").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("versioning", "Versioning"))
        .filter(FilterDescriptor::flag(
            "lifecycle",
            "Lifecycle rules",
            FlagSource::Truthy("hasLifecycleRules".into()),
        ));
    with_envelope(schema)
}

pub fn efs_file_system() -> GridSchema {
    let schema = GridSchema::new("EFSFileSystem", "EFS File Systems")
        .field(
            FieldDescriptor::text("fileSystemId", "File System ID")
                .required()
                .searchable(),
        )
        .field(name_field("fileSystemName", "Name"))
        .field(FieldDescriptor::bytes("sizeInBytes", "Size"))
        .field(FieldDescriptor::text("performanceMode", "Performance"))
        .field(FieldDescriptor::text("throughputMode", "Throughput Mode"))
        .field(
            with_unit("provisionedThroughputInMibps", "Provisioned", " MiB/s").hidden(),
        )
        .field(FieldDescriptor::number("mountTargetsCount", "Mount Targets"))
        .field(FieldDescriptor::list("lifecyclePolicies", "Lifecycle", &[]).hidden())
        .field(FieldDescriptor::boolean("backupPolicyEnabled", "Backups"))
        .field(FieldDescriptor::boolean("encrypted", "Encrypted").hidden())
        .field(FieldDescriptor::nested("metrics", "Metrics").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("throughputMode", "Throughput mode"))
        .filter(FilterDescriptor::flag(
            "backups",
            "Backup policy",
            FlagSource::Truthy("backupPolicyEnabled".into()),
        ));
    with_envelope(schema)
}

pub fn fsx_file_system() -> GridSchema {
    let schema = GridSchema::new("FSxFileSystem", "FSx File Systems")
        .field(
            FieldDescriptor::text("fileSystemId", "File System ID")
                .required()
                .searchable(),
        )
        .field(name_field("fileSystemName", "Name"))
        .field(FieldDescriptor::text("fileSystemType", "Type"))
        .field(FieldDescriptor::text("lifecycle", "Lifecycle"))
        .field(with_unit("storageCapacity", "Capacity", " GiB"))
        .field(FieldDescriptor::text("storageType", "Storage Type").hidden())
        .field(FieldDescriptor::text("deploymentType", "Deployment"))
        .field(with_unit("throughputCapacity", "Throughput", " MB/s").hidden())
        .field(FieldDescriptor::number("automaticBackupRetentionDays", "Backup Retention"))
        .field(
            FieldDescriptor::text("dailyAutomaticBackupStartTime", "Backup Window").hidden(),
        )
        .field(FieldDescriptor::boolean("copyTagsToBackups", "Copy Tags").hidden())
        .field(FieldDescriptor::nested("metrics", "Metrics").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("fileSystemType", "Type"))
        .filter(FilterDescriptor::flag(
            "backups",
            "Automatic backups",
            FlagSource::custom(|record| {
                record
                    .get("automaticBackupRetentionDays")
                    .as_number()
                    .is_some_and(|days| days > 0.0)
            }),
        ));
    with_envelope(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use grid_model::{FieldValue, FilterKind, NormalizedRecord};

    #[test]
    fn volumes_bucket_by_attachment() {
        let schema = ebs_volume();
        let FilterKind::Bucket(source) = &schema.filter_descriptor("attachment").unwrap().kind
        else {
            panic!("expected bucket filter");
        };
        let mut record = NormalizedRecord::default();
        record.insert("attachedInstanceIds", FieldValue::List(vec![]));
        assert_eq!(source.classify(&record, Utc::now()), "unattached");
        record.insert(
            "attachedInstanceIds",
            FieldValue::List(vec!["i-0abc".into()]),
        );
        assert_eq!(source.classify(&record, Utc::now()), "attached");
    }

    #[test]
    fn bucket_storage_is_a_byte_size() {
        let schema = s3_bucket();
        let field = schema.get("storageBytes").unwrap();
        let mut record = NormalizedRecord::default();
        record.insert("storageBytes", FieldValue::Bytes(1 << 30));
        assert_eq!(field.render(&record), "1.00 GB");
    }
}
