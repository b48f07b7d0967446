//! Grid schemas: the ordered column catalog and typed filter declarations for
//! one resource type.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::field::{Callback, FieldDescriptor};
use crate::record::NormalizedRecord;

/// Default threshold separating `recent` from `stale` executions.
pub const DEFAULT_RECENT_HOURS: i64 = 24;

pub type FlagFn = dyn Fn(&NormalizedRecord) -> bool + Send + Sync;
pub type BucketFn = dyn Fn(&NormalizedRecord, DateTime<Utc>) -> String + Send + Sync;

/// Derived boolean used by tri-state filters.
#[derive(Debug, Clone)]
pub enum FlagSource {
    /// The field has content (e.g. "has schedules").
    NonEmpty(String),
    /// The field reads as true.
    Truthy(String),
    Custom(Callback<FlagFn>),
}

impl FlagSource {
    pub fn custom<F>(flag: F) -> Self
    where
        F: Fn(&NormalizedRecord) -> bool + Send + Sync + 'static,
    {
        let flag: Arc<FlagFn> = Arc::new(flag);
        Self::Custom(Callback::from_arc(flag))
    }

    pub fn evaluate(&self, record: &NormalizedRecord) -> bool {
        match self {
            Self::NonEmpty(field) => !record.get(field).is_empty(),
            Self::Truthy(field) => record.get(field).is_truthy(),
            Self::Custom(flag) => flag(record),
        }
    }
}

/// Derived category used by bucket filters.
#[derive(Debug, Clone)]
pub enum BucketSource {
    /// `recent` when the timestamp is within `threshold_hours` of now,
    /// `stale` when older, `never` when absent.
    Recency { field: String, threshold_hours: i64 },
    Custom(Callback<BucketFn>),
}

impl BucketSource {
    pub const RECENT: &'static str = "recent";
    pub const STALE: &'static str = "stale";
    pub const NEVER: &'static str = "never";

    pub fn recency(field: impl Into<String>) -> Self {
        Self::Recency {
            field: field.into(),
            threshold_hours: DEFAULT_RECENT_HOURS,
        }
    }

    pub fn custom<F>(bucket: F) -> Self
    where
        F: Fn(&NormalizedRecord, DateTime<Utc>) -> String + Send + Sync + 'static,
    {
        let bucket: Arc<BucketFn> = Arc::new(bucket);
        Self::Custom(Callback::from_arc(bucket))
    }

    pub fn classify(&self, record: &NormalizedRecord, now: DateTime<Utc>) -> String {
        match self {
            Self::Recency {
                field,
                threshold_hours,
            } => match record.get(field).as_timestamp() {
                None => Self::NEVER.to_string(),
                Some(ts) if now - ts <= TimeDelta::hours(*threshold_hours) => {
                    Self::RECENT.to_string()
                }
                Some(_) => Self::STALE.to_string(),
            },
            Self::Custom(bucket) => bucket(record, now),
        }
    }
}

/// Kind of typed filter.
#[derive(Debug, Clone)]
pub enum FilterKind {
    /// Case-insensitive equality against one field.
    Exact { field: String },
    /// Tri-state predicate over a derived flag.
    Flag(FlagSource),
    /// Comparison against a derived category.
    Bucket(BucketSource),
}

/// A typed filter offered by a resource grid.
#[derive(Debug, Clone)]
pub struct FilterDescriptor {
    pub key: String,
    pub label: String,
    pub kind: FilterKind,
}

impl FilterDescriptor {
    /// Exact-match filter keyed by the field it matches.
    pub fn exact(field: impl Into<String>, label: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            key: field.clone(),
            label: label.into(),
            kind: FilterKind::Exact { field },
        }
    }

    pub fn flag(key: impl Into<String>, label: impl Into<String>, source: FlagSource) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FilterKind::Flag(source),
        }
    }

    pub fn bucket(key: impl Into<String>, label: impl Into<String>, source: BucketSource) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FilterKind::Bucket(source),
        }
    }
}

/// Ordered column catalog for a resource type.
#[derive(Debug, Clone)]
pub struct GridSchema {
    pub resource_type: String,
    pub title: String,
    pub fields: Vec<FieldDescriptor>,
    pub filters: Vec<FilterDescriptor>,
}

impl GridSchema {
    pub fn new(resource_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            title: title.into(),
            fields: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Append a field. A later field with the same key replaces the earlier
    /// one in place.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        for field in fields {
            self = self.field(field);
        }
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: FilterDescriptor) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn filter_descriptor(&self, key: &str) -> Option<&FilterDescriptor> {
        self.filters.iter().find(|filter| filter.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }

    pub fn required_keys(&self) -> BTreeSet<String> {
        self.fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.key.clone())
            .collect()
    }

    /// Default visible subset; every field when none is marked.
    pub fn default_visible_keys(&self) -> BTreeSet<String> {
        let defaults: BTreeSet<String> = self
            .fields
            .iter()
            .filter(|field| field.default_visible)
            .map(|field| field.key.clone())
            .collect();
        if defaults.is_empty() {
            self.fields.iter().map(|field| field.key.clone()).collect()
        } else {
            defaults
        }
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.searchable)
    }
}
