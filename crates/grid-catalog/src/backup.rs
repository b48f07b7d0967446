//! AWS Backup plans and vaults.

use grid_model::{
    BucketSource, FieldDescriptor, FieldValue, FilterDescriptor, FlagSource, GridSchema,
    SortExtractor,
};

use crate::envelope::{with_envelope, with_unit};

/// Recovery points older than this many days are `stale`.
pub const STALE_RECOVERY_POINT_DAYS: f64 = 7.0;

pub(crate) fn schemas() -> Vec<GridSchema> {
    vec![backup_plan(), backup_vault()]
}

pub fn backup_plan() -> GridSchema {
    let schema = GridSchema::new("BackupPlan", "Backup Plans")
        .field(
            FieldDescriptor::text("backupPlanId", "Plan ID")
                .required()
                .searchable(),
        )
        .field(FieldDescriptor::text("backupPlanName", "Name").searchable())
        .field(FieldDescriptor::list("schedules", "Schedules", &["scheduleExpression"]))
        .field(with_unit("windowStart", "Start Window", " min").hidden())
        .field(with_unit("windowDuration", "Completion Window", " min").hidden())
        .field(FieldDescriptor::text("targetBackupVault", "Target Vault").searchable())
        .field(
            FieldDescriptor::list("selectionResourceTypes", "Protects", &["resourceType"])
                .searchable(),
        )
        .field(FieldDescriptor::timestamp("lastExecutionDate", "Last Run"))
        .field(FieldDescriptor::timestamp("createdAt", "Created").hidden())
        .filter(FilterDescriptor::flag(
            "hasSchedules",
            "Has schedules",
            FlagSource::NonEmpty("schedules".into()),
        ))
        .filter(FilterDescriptor::bucket(
            "lastRun",
            "Last run",
            BucketSource::recency("lastExecutionDate"),
        ))
        .filter(FilterDescriptor::exact("targetBackupVault", "Target vault"));
    with_envelope(schema)
}

fn recovery_point_age(value: &FieldValue) -> Option<f64> {
    value.as_number().filter(|days| *days >= 0.0)
}

pub fn backup_vault() -> GridSchema {
    let schema = GridSchema::new("BackupVault", "Backup Vaults")
        .field(
            FieldDescriptor::text("backupVaultName", "Vault")
                .required()
                .searchable(),
        )
        .field(FieldDescriptor::boolean("locked", "Locked"))
        .field(FieldDescriptor::number("numberOfRecoveryPoints", "Recovery Points"))
        .field(
            FieldDescriptor::number("latestRecoveryPointAgeDays", "Latest Point Age")
                .sort_with(SortExtractor::StaleLast)
                .with_transform(|record| {
                    match recovery_point_age(record.get("latestRecoveryPointAgeDays")) {
                        Some(days) => format!("{} days", grid_model::format_number(days)),
                        None => "Never".to_string(),
                    }
                }),
        )
        .field(FieldDescriptor::text("encryptionKeyArn", "KMS Key").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::flag(
            "locked",
            "Locked",
            FlagSource::Truthy("locked".into()),
        ))
        .filter(FilterDescriptor::bucket(
            "recoveryPoints",
            "Latest recovery point",
            BucketSource::custom(|record, _now| {
                let bucket = match recovery_point_age(record.get("latestRecoveryPointAgeDays")) {
                    None => BucketSource::NEVER,
                    Some(days) if days <= STALE_RECOVERY_POINT_DAYS => BucketSource::RECENT,
                    Some(_) => BucketSource::STALE,
                };
                bucket.to_string()
            }),
        ));
    with_envelope(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use grid_model::{FilterKind, NormalizedRecord, SortKey};

    fn vault(age: f64) -> NormalizedRecord {
        let mut record = NormalizedRecord::default();
        record.insert("latestRecoveryPointAgeDays", FieldValue::Number(age));
        record
    }

    #[test]
    fn age_column_renders_sentinel_as_never() {
        let schema = backup_vault();
        let field = schema.get("latestRecoveryPointAgeDays").unwrap();
        assert_eq!(field.render(&vault(-1.0)), "Never");
        assert_eq!(field.render(&vault(3.0)), "3 days");
        assert_eq!(field.sort_key(&vault(-1.0)), SortKey::Last);
        assert_eq!(field.sort_key(&vault(0.0)), SortKey::Number(0.0));
    }

    #[test]
    fn recovery_point_buckets() {
        let schema = backup_vault();
        let FilterKind::Bucket(source) = &schema.filter_descriptor("recoveryPoints").unwrap().kind
        else {
            panic!("expected bucket filter");
        };
        let now = Utc::now();
        assert_eq!(source.classify(&vault(-1.0), now), "never");
        assert_eq!(source.classify(&vault(2.0), now), "recent");
        assert_eq!(source.classify(&vault(30.0), now), "stale");
    }
}
