//! Free-text and typed filtering.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use grid_model::{FilterDescriptor, FilterKind, FilterState, FilterValue, GridSchema, NormalizedRecord};

/// Lowercased concatenation of the searchable fields' rendered cells.
pub fn haystack(schema: &GridSchema, record: &NormalizedRecord) -> String {
    schema
        .searchable_fields()
        .map(|field| field.render(record))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn matches_filter(
    descriptor: &FilterDescriptor,
    value: &FilterValue,
    record: &NormalizedRecord,
    now: DateTime<Utc>,
) -> bool {
    match (&descriptor.kind, value) {
        (FilterKind::Exact { field }, FilterValue::Exact(wanted)) => {
            let wanted = wanted.trim().to_lowercase();
            record
                .get(field)
                .option_values()
                .iter()
                .any(|candidate| candidate.to_lowercase() == wanted)
        }
        (FilterKind::Flag(source), FilterValue::Flag(state)) => state.accepts(source.evaluate(record)),
        (FilterKind::Bucket(source), FilterValue::Bucket(wanted)) => source
            .classify(record, now)
            .eq_ignore_ascii_case(wanted.trim()),
        // Mismatched kinds were already dropped when resolving.
        _ => true,
    }
}

/// Resolve active filter values against the schema's declarations.
fn resolve<'a>(
    schema: &'a GridSchema,
    state: &'a FilterState,
) -> Vec<(&'a FilterDescriptor, &'a FilterValue)> {
    state
        .active()
        .filter_map(|(key, value)| {
            let Some(descriptor) = schema.filter_descriptor(key) else {
                tracing::debug!(
                    resource_type = %schema.resource_type,
                    filter = key,
                    "ignoring undeclared filter"
                );
                return None;
            };
            let compatible = matches!(
                (&descriptor.kind, value),
                (FilterKind::Exact { .. }, FilterValue::Exact(_))
                    | (FilterKind::Flag(_), FilterValue::Flag(_))
                    | (FilterKind::Bucket(_), FilterValue::Bucket(_))
            );
            if !compatible {
                tracing::debug!(
                    resource_type = %schema.resource_type,
                    filter = key,
                    "ignoring filter value of the wrong kind"
                );
                return None;
            }
            Some((descriptor, value))
        })
        .collect()
}

/// Records passing the search term and every active typed filter, in input
/// order.
pub fn apply_filters<'r>(
    records: &'r [NormalizedRecord],
    schema: &GridSchema,
    state: &FilterState,
    now: DateTime<Utc>,
) -> Vec<&'r NormalizedRecord> {
    let term = state.term();
    let active = resolve(schema, state);

    records
        .iter()
        .filter(|record| term.is_empty() || haystack(schema, record).contains(term))
        .filter(|record| {
            active
                .iter()
                .all(|(descriptor, value)| matches_filter(descriptor, value, record, now))
        })
        .collect()
}

/// Distinct display values of a field, sorted. List fields are flattened.
pub fn filter_options<'r>(
    records: impl IntoIterator<Item = &'r NormalizedRecord>,
    field: &str,
) -> Vec<String> {
    records
        .into_iter()
        .flat_map(|record| record.get(field).option_values())
        .filter(|value| !value.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use grid_model::{BucketSource, FieldDescriptor, FieldValue, FlagSource, TriState};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()
    }

    fn schema() -> GridSchema {
        GridSchema::new("BackupPlan", "Backup Plans")
            .field(FieldDescriptor::text("backupPlanName", "Name").searchable())
            .field(FieldDescriptor::text("region", "Region"))
            .field(FieldDescriptor::list("schedules", "Schedules", &[]))
            .field(FieldDescriptor::timestamp("lastExecutionDate", "Last Run"))
            .filter(FilterDescriptor::exact("region", "Region"))
            .filter(FilterDescriptor::flag(
                "hasSchedules",
                "Has Schedules",
                FlagSource::NonEmpty("schedules".into()),
            ))
            .filter(FilterDescriptor::bucket(
                "lastRun",
                "Last Run",
                BucketSource::recency("lastExecutionDate"),
            ))
    }

    fn plan(name: &str, region: &str, schedules: &[&str], ran_hours_ago: Option<i64>) -> NormalizedRecord {
        let mut record = NormalizedRecord::default();
        record.insert("backupPlanName", FieldValue::Text(name.into()));
        record.insert("region", FieldValue::Text(region.into()));
        record.insert(
            "schedules",
            FieldValue::List(schedules.iter().map(|s| (*s).to_string()).collect()),
        );
        record.insert(
            "lastExecutionDate",
            ran_hours_ago.map_or(FieldValue::Absent, |h| {
                FieldValue::Timestamp(now() - Duration::hours(h))
            }),
        );
        record
    }

    fn records() -> Vec<NormalizedRecord> {
        vec![
            plan("prod-db-1", "us-east-1", &["daily"], Some(2)),
            plan("stage-web", "eu-west-1", &[], None),
            plan("prod-web", "US-EAST-1", &["weekly"], Some(72)),
        ]
    }

    fn names(rows: &[&NormalizedRecord]) -> Vec<String> {
        rows.iter().map(|r| r.text("backupPlanName")).collect()
    }

    #[test]
    fn term_matches_substring() {
        let records = records();
        let state = FilterState::new().with_term("PROD");
        let rows = apply_filters(&records, &schema(), &state, now());
        assert_eq!(names(&rows), ["prod-db-1", "prod-web"]);
    }

    #[test]
    fn exact_is_case_insensitive() {
        let records = records();
        let state = FilterState::new().with("region", FilterValue::Exact("us-east-1".into()));
        let rows = apply_filters(&records, &schema(), &state, now());
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn flag_tri_state() {
        let records = records();
        let yes = FilterState::new().with("hasSchedules", FilterValue::Flag(TriState::Yes));
        let no = FilterState::new().with("hasSchedules", FilterValue::Flag(TriState::No));
        assert_eq!(apply_filters(&records, &schema(), &yes, now()).len(), 2);
        assert_eq!(names(&apply_filters(&records, &schema(), &no, now())), ["stage-web"]);
    }

    #[test]
    fn recency_bucket() {
        let records = records();
        let check = |bucket: &str| {
            let state = FilterState::new().with("lastRun", FilterValue::Bucket(bucket.into()));
            names(&apply_filters(&records, &schema(), &state, now()))
        };
        assert_eq!(check("recent"), ["prod-db-1"]);
        assert_eq!(check("stale"), ["prod-web"]);
        assert_eq!(check("never"), ["stage-web"]);
    }

    #[test]
    fn undeclared_and_mismatched_filters_are_ignored() {
        let records = records();
        let state = FilterState::new()
            .with("owner", FilterValue::Exact("nobody".into()))
            .with("region", FilterValue::Flag(TriState::No));
        assert_eq!(apply_filters(&records, &schema(), &state, now()).len(), 3);
    }

    #[test]
    fn options_are_distinct_and_sorted() {
        let records = records();
        assert_eq!(
            filter_options(&records, "region"),
            ["US-EAST-1", "eu-west-1", "us-east-1"]
        );
        assert_eq!(filter_options(&records, "schedules"), ["daily", "weekly"]);
    }
}
