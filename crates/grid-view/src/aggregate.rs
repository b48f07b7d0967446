//! Distribution counts and totals over a result set.

use std::collections::BTreeMap;

use grid_model::NormalizedRecord;

/// Occurrences of one display value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Total of a numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summation {
    pub total: f64,
    /// Records that contributed a value.
    pub counted: usize,
    /// Records with an absent or non-numeric value.
    pub skipped: usize,
}

/// Count records per display value of `field`, most frequent first, ties by
/// value. List fields count each element; empty values are not counted.
pub fn count_by<'r>(
    records: impl IntoIterator<Item = &'r NormalizedRecord>,
    field: &str,
    top: Option<usize>,
) -> Vec<ValueCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        for value in record.get(field).option_values() {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut ranked: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    if let Some(top) = top {
        ranked.truncate(top);
    }
    ranked
}

/// Sum a numeric field, ignoring absent values.
pub fn sum_field<'r>(
    records: impl IntoIterator<Item = &'r NormalizedRecord>,
    field: &str,
) -> Summation {
    records
        .into_iter()
        .fold(Summation::default(), |mut sum, record| {
            match record.get(field).as_number() {
                Some(n) => {
                    sum.total += n;
                    sum.counted += 1;
                }
                None => sum.skipped += 1,
            }
            sum
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_model::FieldValue;

    fn record(region: &str, bytes: Option<u64>) -> NormalizedRecord {
        let mut record = NormalizedRecord::default();
        record.insert("region", FieldValue::Text(region.into()));
        record.insert("storageBytes", bytes.map_or(FieldValue::Absent, FieldValue::Bytes));
        record
    }

    #[test]
    fn counts_rank_by_frequency() {
        let records = [
            record("eu-west-1", None),
            record("us-east-1", None),
            record("us-east-1", None),
            record("", None),
        ];
        let counts = count_by(&records, "region", None);
        assert_eq!(
            counts,
            vec![
                ValueCount { value: "us-east-1".into(), count: 2 },
                ValueCount { value: "eu-west-1".into(), count: 1 },
            ]
        );
        assert_eq!(count_by(&records, "region", Some(1)).len(), 1);
    }

    #[test]
    fn sums_skip_absent() {
        let records = [record("a", Some(10)), record("b", None), record("c", Some(5))];
        let sum = sum_field(&records, "storageBytes");
        assert_eq!(sum.total, 15.0);
        assert_eq!(sum.counted, 2);
        assert_eq!(sum.skipped, 1);
    }
}
