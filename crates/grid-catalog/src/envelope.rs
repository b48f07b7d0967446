//! Fields every collected record carries, plus shared render helpers.

use grid_model::{FieldDescriptor, FieldValue, FilterDescriptor, GridSchema, NormalizedRecord};

pub const ACCOUNT_ID: &str = "accountId";
pub const ACCOUNT_NAME: &str = "accountName";
pub const REGION: &str = "region";
pub const TAGS: &str = "tags";
pub const LAST_UPDATED: &str = "lastUpdated";

/// Tag whose value stands in for a missing resource name.
pub const NAME_TAG: &str = "Name";

/// Append the common envelope fields and their filters.
///
/// Fields the schema already declares keep their position and settings.
pub fn with_envelope(schema: GridSchema) -> GridSchema {
    let mut schema = schema;
    let envelope = [
        FieldDescriptor::text(ACCOUNT_NAME, "Account").searchable(),
        FieldDescriptor::text(ACCOUNT_ID, "Account ID").hidden(),
        FieldDescriptor::text(REGION, "Region").searchable(),
        FieldDescriptor::tags(TAGS, "Tags").searchable().hidden(),
        FieldDescriptor::timestamp(LAST_UPDATED, "Last Updated").hidden(),
    ];
    for field in envelope {
        if !schema.has_field(&field.key) {
            schema = schema.field(field);
        }
    }
    schema
        .filter(FilterDescriptor::exact(REGION, "Region"))
        .filter(FilterDescriptor::exact(ACCOUNT_NAME, "Account"))
}

/// Display name: the field itself, or the `Name` tag when the field is empty
/// or a collector placeholder.
pub fn name_or_tag(record: &NormalizedRecord, key: &str) -> String {
    let name = record.text(key);
    if !grid_model::is_placeholder(&name) {
        return name;
    }
    match record.get(TAGS) {
        FieldValue::Tags(tags) => tags.get(NAME_TAG).cloned().unwrap_or(name),
        _ => name,
    }
}

/// Name column rendered through [`name_or_tag`].
pub(crate) fn name_field(key: &'static str, label: &str) -> FieldDescriptor {
    FieldDescriptor::text(key, label)
        .searchable()
        .with_transform(move |record| name_or_tag(record, key))
}

/// Number rendered with a unit suffix; absent stays blank.
pub(crate) fn with_unit(key: &'static str, label: &str, unit: &'static str) -> FieldDescriptor {
    FieldDescriptor::number(key, label).with_transform(move |record| {
        match record.get(key) {
            FieldValue::Absent => String::new(),
            value => format!("{}{unit}", value.display_text()),
        }
    })
}

/// Whether a scalar text field carries a real value.
pub(crate) fn has_text(record: &NormalizedRecord, key: &str) -> bool {
    !grid_model::is_placeholder(&record.text(key))
}
