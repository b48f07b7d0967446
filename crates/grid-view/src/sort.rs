//! Stable column sorting.

use std::cmp::Ordering;

use grid_model::{GridSchema, NormalizedRecord, SortDirection, SortKey, SortState};

/// Compare two keys under a direction. [`SortKey::Last`] sorts after every
/// other key in both directions.
pub fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortKey::Last, SortKey::Last) => Ordering::Equal,
        (SortKey::Last, _) => Ordering::Greater,
        (_, SortKey::Last) => Ordering::Less,
        _ => match direction {
            SortDirection::Asc => a.compare(b),
            SortDirection::Desc => b.compare(a),
        },
    }
}

/// Sort records by the active column. Equal keys keep their relative order.
///
/// No column, an undeclared column, or an unsortable column leaves the order
/// unchanged.
pub fn sort_records<'r>(
    records: Vec<&'r NormalizedRecord>,
    schema: &GridSchema,
    sort: &SortState,
) -> Vec<&'r NormalizedRecord> {
    let Some(column) = sort.column.as_deref() else {
        return records;
    };
    let Some(field) = schema.get(column).filter(|field| field.sortable) else {
        tracing::debug!(
            resource_type = %schema.resource_type,
            column,
            "column is not sortable, keeping order"
        );
        return records;
    };

    let mut keyed: Vec<(SortKey, &'r NormalizedRecord)> = records
        .into_iter()
        .map(|record| (field.sort_key(record), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, sort.direction));
    keyed.into_iter().map(|(_, record)| record).collect()
}
