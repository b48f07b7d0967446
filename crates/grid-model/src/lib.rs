//! Data model for the resource grid engine.
//!
//! Every list view in the inventory dashboard is an instance of the same
//! pipeline (normalize, filter, sort, paginate, export) parameterized by a
//! declarative [`GridSchema`]. This crate holds the types shared by every stage:
//!
//! - [`field`]: field descriptors, value kinds, render transforms and sort extractors
//! - [`schema`]: the ordered field catalog and typed filter declarations per resource type
//! - [`value`]: canonical field values and their display rendering
//! - [`record`]: raw and normalized records
//! - [`state`]: the serializable view state (filters, sort, pagination)
//! - [`config`]: engine tunables
//! - [`store`]: collaborator interfaces for resource and preference stores

pub mod config;
pub mod error;
pub mod field;
pub mod record;
pub mod schema;
pub mod state;
pub mod store;
pub mod value;

pub use config::GridConfig;
pub use error::{GridError, Result};
pub use field::{Callback, FieldDescriptor, SortExtractor, SortKey, Transform, ValueKind};
pub use record::{NormalizedRecord, RawRecord};
pub use schema::{BucketSource, FilterDescriptor, FilterKind, FlagSource, GridSchema};
pub use state::{
    FilterState, FilterValue, PaginationState, SortDirection, SortState, TriState, ViewState,
};
pub use store::{CachedStore, MemoryPreferences, PreferenceStore, ResourceStore};
pub use value::{FieldValue, format_bytes, format_number};

/// Placeholder tokens the upstream collectors write in place of missing values.
pub const PLACEHOLDER_TOKENS: &[&str] = &["N/A", "n/a", "None", "none", "null", "NULL", "-"];

/// Returns true when `value` is empty or one of the [`PLACEHOLDER_TOKENS`].
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || PLACEHOLDER_TOKENS.contains(&trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_tokens() {
        assert!(is_placeholder("N/A"));
        assert!(is_placeholder("  "));
        assert!(is_placeholder("null"));
        assert!(!is_placeholder("0"));
        assert!(!is_placeholder("running"));
    }
}
