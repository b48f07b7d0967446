//! EC2 instances, images, snapshots and auto scaling groups.

use grid_model::{
    BucketSource, FieldDescriptor, FieldValue, FilterDescriptor, FlagSource, GridSchema,
};

use crate::envelope::{has_text, name_field, with_envelope, with_unit};

/// Utilization at or above this percentage is bucketed as `high`.
pub const HIGH_UTILIZATION_PERCENT: f64 = 80.0;

pub(crate) fn schemas() -> Vec<GridSchema> {
    vec![ec2_instance(), ebs_snapshot(), ami(), auto_scaling_group()]
}

fn percent(key: &'static str, label: &str) -> FieldDescriptor {
    with_unit(key, label, "%")
}

fn utilization_bucket(key: &'static str) -> BucketSource {
    BucketSource::custom(move |record, _now| {
        let bucket = match record.get(key).as_number() {
            None => "unknown",
            Some(value) if value >= HIGH_UTILIZATION_PERCENT => "high",
            Some(_) => "normal",
        };
        bucket.to_string()
    })
}

pub fn ec2_instance() -> GridSchema {
    let schema = GridSchema::new("EC2Instance", "EC2 Instances")
        .field(
            FieldDescriptor::text("instanceId", "Instance ID")
                .required()
                .searchable()
                .min_width(20),
        )
        .field(name_field("instanceName", "Name"))
        .field(FieldDescriptor::text("instanceType", "Type"))
        .field(FieldDescriptor::text("instanceState", "State"))
        .field(FieldDescriptor::text("platformDetails", "Platform").hidden())
        .field(FieldDescriptor::text("amiName", "AMI").hidden())
        .field(FieldDescriptor::text("iamRole", "IAM Role").hidden())
        .field(FieldDescriptor::text("healthStatus", "Health"))
        .field(FieldDescriptor::number("healthChecksPassed", "Checks Passed").hidden())
        .field(
            FieldDescriptor::number("healthChecksTotal", "Checks").with_transform(|record| {
                match (
                    record.get("healthChecksPassed"),
                    record.get("healthChecksTotal"),
                ) {
                    (FieldValue::Number(passed), FieldValue::Number(total)) => format!(
                        "{}/{}",
                        grid_model::format_number(*passed),
                        grid_model::format_number(*total)
                    ),
                    _ => String::new(),
                }
            }),
        )
        .field(FieldDescriptor::text("systemStatus", "System Status").hidden())
        .field(FieldDescriptor::text("instanceStatus", "Instance Status").hidden())
        .field(FieldDescriptor::text("ebsStatus", "EBS Status").hidden())
        .field(FieldDescriptor::text("swoBackup", "Backup Tag").searchable())
        .field(FieldDescriptor::text("swoPatch", "Patch Tag"))
        .field(FieldDescriptor::text("swoRiskClass", "Risk Class").hidden())
        .field(FieldDescriptor::text("swoMonitor", "Monitor Tag").hidden())
        .field(FieldDescriptor::text("patchGroup", "Patch Group").hidden())
        .field(FieldDescriptor::text("startStop", "Start/Stop").hidden())
        .field(FieldDescriptor::text("autoStart", "Auto Start").hidden())
        .field(FieldDescriptor::text("autoShutdown", "Auto Shutdown").hidden())
        .field(FieldDescriptor::text("saturday", "Saturday").hidden())
        .field(FieldDescriptor::text("sunday", "Sunday").hidden())
        .field(FieldDescriptor::text("ssmStatus", "SSM"))
        .field(FieldDescriptor::text("ssmPingStatus", "SSM Ping").hidden())
        .field(FieldDescriptor::text("ssmVersion", "SSM Agent").hidden())
        .field(FieldDescriptor::timestamp("ssmLastPingTime", "Last SSM Ping").hidden())
        .field(FieldDescriptor::boolean("cwAgentMemoryDetected", "CW Memory").hidden())
        .field(FieldDescriptor::boolean("cwAgentDiskDetected", "CW Disk").hidden())
        .field(percent("ramUtilization", "RAM"))
        .field(percent("diskUtilization", "Disk"))
        .field(
            FieldDescriptor::list("instancePrivateIps", "Private IPs", &["privateIpAddress"])
                .searchable(),
        )
        .field(
            FieldDescriptor::list("instancePublicIps", "Public IPs", &["publicIp"])
                .searchable()
                .hidden(),
        )
        .field(FieldDescriptor::boolean("isWindows", "Windows").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Launched"))
        .filter(FilterDescriptor::exact("instanceState", "State"))
        .filter(FilterDescriptor::exact("instanceType", "Type"))
        .filter(FilterDescriptor::flag(
            "backupTagged",
            "Backup tag",
            FlagSource::custom(|record| has_text(record, "swoBackup")),
        ))
        .filter(FilterDescriptor::flag(
            "windows",
            "Windows",
            FlagSource::Truthy("isWindows".into()),
        ))
        .filter(FilterDescriptor::bucket(
            "ramLoad",
            "RAM load",
            utilization_bucket("ramUtilization"),
        ))
        .filter(FilterDescriptor::bucket(
            "diskLoad",
            "Disk load",
            utilization_bucket("diskUtilization"),
        ));
    with_envelope(schema)
}

pub fn ebs_snapshot() -> GridSchema {
    let schema = GridSchema::new("EBSSnapshot", "EBS Snapshots")
        .field(
            FieldDescriptor::text("snapshotId", "Snapshot ID")
                .required()
                .searchable(),
        )
        .field(name_field("snapshotName", "Name"))
        .field(FieldDescriptor::text("volumeId", "Volume").searchable())
        .field(FieldDescriptor::text("snapshotState", "State"))
        .field(with_unit("volumeSize", "Size", " GiB"))
        .field(FieldDescriptor::boolean("encrypted", "Encrypted"))
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("snapshotState", "State"))
        .filter(FilterDescriptor::flag(
            "encrypted",
            "Encrypted",
            FlagSource::Truthy("encrypted".into()),
        ));
    with_envelope(schema)
}

pub fn ami() -> GridSchema {
    let schema = GridSchema::new("AMI", "Machine Images")
        .field(FieldDescriptor::text("imageId", "Image ID").required().searchable())
        .field(name_field("imageName", "Name"))
        .field(FieldDescriptor::text("imageState", "State"))
        .field(FieldDescriptor::text("description", "Description").searchable())
        .field(FieldDescriptor::text("platform", "Platform"))
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("imageState", "State"))
        .filter(FilterDescriptor::exact("platform", "Platform"));
    with_envelope(schema)
}

pub fn auto_scaling_group() -> GridSchema {
    let schema = GridSchema::new("AutoScalingGroup", "Auto Scaling Groups")
        .field(
            FieldDescriptor::text("autoScalingGroupName", "Group")
                .required()
                .searchable(),
        )
        .field(FieldDescriptor::text("autoScalingGroupNameTag", "Name Tag").searchable())
        .field(FieldDescriptor::text("autoScalingGroupARN", "ARN").hidden())
        .field(FieldDescriptor::text("launchConfigurationName", "Launch Config").hidden())
        .field(FieldDescriptor::number("minSize", "Min"))
        .field(FieldDescriptor::number("maxSize", "Max"))
        .field(FieldDescriptor::number("desiredCapacity", "Desired"))
        .field(FieldDescriptor::number("currentSize", "Current"))
        .field(FieldDescriptor::number("healthyInstances", "Healthy"))
        .field(FieldDescriptor::text("healthCheckType", "Health Check"))
        .field(with_unit("healthCheckGracePeriod", "Grace Period", "s").hidden())
        .field(
            FieldDescriptor::list("vpcZoneIdentifier", "Subnets", &["subnetId"])
                .searchable()
                .hidden(),
        )
        .field(FieldDescriptor::text("serviceLinkedRoleARN", "Service Role").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("healthCheckType", "Health check"))
        .filter(FilterDescriptor::flag(
            "underCapacity",
            "Below desired",
            FlagSource::custom(|record| {
                match (
                    record.get("healthyInstances").as_number(),
                    record.get("desiredCapacity").as_number(),
                ) {
                    (Some(healthy), Some(desired)) => healthy < desired,
                    _ => false,
                }
            }),
        ));
    with_envelope(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use grid_model::NormalizedRecord;

    #[test]
    fn health_checks_render_as_ratio() {
        let schema = ec2_instance();
        let field = schema.get("healthChecksTotal").unwrap();
        let mut record = NormalizedRecord::default();
        assert_eq!(field.render(&record), "");
        record.insert("healthChecksPassed", FieldValue::Number(2.0));
        record.insert("healthChecksTotal", FieldValue::Number(3.0));
        assert_eq!(field.render(&record), "2/3");
    }

    #[test]
    fn utilization_buckets() {
        let bucket = utilization_bucket("ramUtilization");
        let now = Utc::now();
        let mut record = NormalizedRecord::default();
        assert_eq!(bucket.classify(&record, now), "unknown");
        record.insert("ramUtilization", FieldValue::Number(91.5));
        assert_eq!(bucket.classify(&record, now), "high");
        record.insert("ramUtilization", FieldValue::Number(12.0));
        assert_eq!(bucket.classify(&record, now), "normal");
    }

    #[test]
    fn asg_under_capacity_flag() {
        let schema = auto_scaling_group();
        let filter = schema.filter_descriptor("underCapacity").unwrap();
        let grid_model::FilterKind::Flag(source) = &filter.kind else {
            panic!("expected flag filter");
        };
        let mut record = NormalizedRecord::default();
        record.insert("healthyInstances", FieldValue::Number(1.0));
        record.insert("desiredCapacity", FieldValue::Number(2.0));
        assert!(source.evaluate(&record));
        record.insert("healthyInstances", FieldValue::Number(2.0));
        assert!(!source.evaluate(&record));
    }
}
