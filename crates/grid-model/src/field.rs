//! Field descriptors.
//!
//! A [`FieldDescriptor`] declares one column of a resource grid: how its raw
//! value is decoded, how it is labelled, rendered, sorted, and whether it may
//! be hidden. The same descriptor drives on-screen rendering and export.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::record::NormalizedRecord;
use crate::value::FieldValue;

/// Render transform signature.
pub type RenderFn = dyn Fn(&NormalizedRecord) -> String + Send + Sync;

/// Custom sort-key signature.
pub type SortKeyFn = dyn Fn(&NormalizedRecord) -> SortKey + Send + Sync;

/// Shared, cloneable closure attached to a schema declaration.
pub struct Callback<F: ?Sized>(Arc<F>);

impl<F: ?Sized> Callback<F> {
    pub fn from_arc(inner: Arc<F>) -> Self {
        Self(inner)
    }
}

impl<F: ?Sized> Clone for Callback<F> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<F: ?Sized> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

impl<F: ?Sized> Deref for Callback<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.0
    }
}

/// Render transform applied to a whole record to produce a cell.
pub type Transform = Callback<RenderFn>;

/// How a raw field is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueKind {
    /// Plain text; structured values are rendered as compact JSON.
    Scalar,
    /// Numeric from number or string; unparseable input is absent.
    Number,
    /// Human size string such as `59.28 TB`, canonicalized to bytes.
    ByteSize,
    Boolean,
    Timestamp,
    /// List of strings. Objects contribute their identifier, looked up via
    /// `id`, `resourceId`, then `id_aliases` in order.
    StringList {
        #[serde(default)]
        id_aliases: Vec<String>,
    },
    /// Tag name to value mapping.
    TagMap,
    /// Nested JSON object.
    Nested,
}

impl ValueKind {
    /// Build a string-list kind with type-specific identifier aliases.
    pub fn list_with_aliases(aliases: &[&str]) -> Self {
        Self::StringList {
            id_aliases: aliases.iter().map(|alias| (*alias).to_string()).collect(),
        }
    }

    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Number => "number",
            Self::ByteSize => "byte-size",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::StringList { .. } => "string-list",
            Self::TagMap => "tag-map",
            Self::Nested => "nested-object",
        }
    }
}

/// Comparison key produced by a sort extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Text(String),
    /// Sorts after every other key regardless of direction.
    Last,
}

impl SortKey {
    /// Compare two non-`Last` keys.
    ///
    /// Numbers compare numerically when both sides are numeric; anything else
    /// compares case-insensitively by text, falling back to the exact text so
    /// that the order is total.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            _ => {
                let left = self.text();
                let right = other.text();
                left.to_lowercase()
                    .cmp(&right.to_lowercase())
                    .then_with(|| left.cmp(&right))
            }
        }
    }

    fn text(&self) -> String {
        match self {
            Self::Number(n) => crate::value::format_number(*n),
            Self::Text(text) => text.clone(),
            Self::Last => String::new(),
        }
    }
}

/// Extracts the comparison key for a column.
#[derive(Debug, Clone, Default)]
pub enum SortExtractor {
    /// Use the field value.
    #[default]
    Field,
    /// Numeric field where a missing or negative value means "infinitely
    /// stale" and always sorts last.
    StaleLast,
    Custom(Callback<SortKeyFn>),
}

/// Declaration of one grid column.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    pub kind: ValueKind,
    pub sortable: bool,
    /// Required columns can never be hidden.
    pub required: bool,
    /// Included in the free-text haystack.
    pub searchable: bool,
    /// Part of the resource type's default column subset.
    pub default_visible: bool,
    pub transform: Option<Transform>,
    pub sort_extractor: SortExtractor,
    pub min_width: Option<u16>,
}

impl FieldDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: ValueKind) -> Self {
        let sortable = !matches!(kind, ValueKind::TagMap | ValueKind::Nested);
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            sortable,
            required: false,
            searchable: false,
            default_visible: true,
            transform: None,
            sort_extractor: SortExtractor::Field,
            min_width: None,
        }
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ValueKind::Scalar)
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ValueKind::Number)
    }

    pub fn bytes(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ValueKind::ByteSize)
    }

    pub fn boolean(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ValueKind::Boolean)
    }

    pub fn timestamp(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ValueKind::Timestamp)
    }

    pub fn list(key: impl Into<String>, label: impl Into<String>, aliases: &[&str]) -> Self {
        Self::new(key, label, ValueKind::list_with_aliases(aliases))
    }

    pub fn tags(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ValueKind::TagMap)
    }

    pub fn nested(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ValueKind::Nested)
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Exclude from the default column subset.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.default_visible = false;
        self
    }

    #[must_use]
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    #[must_use]
    pub fn min_width(mut self, width: u16) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Attach a render transform shared by grid cells and exports.
    #[must_use]
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&NormalizedRecord) -> String + Send + Sync + 'static,
    {
        let transform: Arc<RenderFn> = Arc::new(transform);
        self.transform = Some(Callback::from_arc(transform));
        self
    }

    #[must_use]
    pub fn sort_with(mut self, extractor: SortExtractor) -> Self {
        self.sort_extractor = extractor;
        self
    }

    /// Override the sort key with a closure.
    #[must_use]
    pub fn sort_by_key<F>(self, extractor: F) -> Self
    where
        F: Fn(&NormalizedRecord) -> SortKey + Send + Sync + 'static,
    {
        let extractor: Arc<SortKeyFn> = Arc::new(extractor);
        self.sort_with(SortExtractor::Custom(Callback::from_arc(extractor)))
    }

    /// Rendered cell text for a record.
    pub fn render(&self, record: &NormalizedRecord) -> String {
        match &self.transform {
            Some(transform) => transform(record),
            None => record.get(&self.key).display_text(),
        }
    }

    /// Comparison key for a record.
    pub fn sort_key(&self, record: &NormalizedRecord) -> SortKey {
        let value = record.get(&self.key);
        match &self.sort_extractor {
            SortExtractor::Field => default_sort_key(value),
            SortExtractor::StaleLast => match value.as_number() {
                Some(n) if n >= 0.0 => SortKey::Number(n),
                _ => SortKey::Last,
            },
            SortExtractor::Custom(extract) => extract(record),
        }
    }
}

fn default_sort_key(value: &FieldValue) -> SortKey {
    match value {
        FieldValue::Absent => SortKey::Text(String::new()),
        FieldValue::Text(text) => SortKey::Text(text.clone()),
        other => match other.as_number() {
            Some(n) => SortKey::Number(n),
            None => SortKey::Text(other.display_text()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, value: FieldValue) -> NormalizedRecord {
        let mut record = NormalizedRecord::default();
        record.insert(key, value);
        record
    }

    #[test]
    fn tag_and_nested_fields_are_not_sortable_by_default() {
        assert!(!FieldDescriptor::tags("tags", "Tags").sortable);
        assert!(!FieldDescriptor::nested("meta", "Meta").sortable);
        assert!(FieldDescriptor::text("name", "Name").sortable);
    }

    #[test]
    fn render_uses_transform_when_present() {
        let field = FieldDescriptor::number("size", "Size")
            .with_transform(|r| format!("{} GiB", r.get("size").display_text()));
        let rec = record("size", FieldValue::Number(8.0));
        assert_eq!(field.render(&rec), "8 GiB");
    }

    #[test]
    fn render_defaults_to_display_text() {
        let field = FieldDescriptor::boolean("encrypted", "Encrypted");
        let rec = record("encrypted", FieldValue::Bool(true));
        assert_eq!(field.render(&rec), "Yes");
    }

    #[test]
    fn stale_last_extractor_maps_sentinels() {
        let field = FieldDescriptor::number("ageDays", "Age").sort_with(SortExtractor::StaleLast);
        assert_eq!(
            field.sort_key(&record("ageDays", FieldValue::Number(-1.0))),
            SortKey::Last
        );
        assert_eq!(
            field.sort_key(&record("ageDays", FieldValue::Absent)),
            SortKey::Last
        );
        assert_eq!(
            field.sort_key(&record("ageDays", FieldValue::Number(3.0))),
            SortKey::Number(3.0)
        );
    }

    #[test]
    fn text_compare_is_case_insensitive() {
        let a = SortKey::Text("alpha".into());
        let b = SortKey::Text("Beta".into());
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn mixed_keys_compare_as_text() {
        let a = SortKey::Number(10.0);
        let b = SortKey::Text("9".into());
        assert_eq!(a.compare(&b), Ordering::Less);
    }
}
