//! Registry of resource schemas indexed by resource type.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use grid_model::{GridError, GridSchema, Result};

use crate::{backup, compute, database, networking, storage};

/// Service family a resource type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Compute,
    Storage,
    Database,
    Networking,
    Backup,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Compute,
        Category::Storage,
        Category::Database,
        Category::Networking,
        Category::Backup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Compute => "Compute",
            Self::Storage => "Storage",
            Self::Database => "Database",
            Self::Networking => "Networking",
            Self::Backup => "Backup",
        }
    }

    fn schemas(self) -> Vec<GridSchema> {
        match self {
            Self::Compute => compute::schemas(),
            Self::Storage => storage::schemas(),
            Self::Database => database::schemas(),
            Self::Networking => networking::schemas(),
            Self::Backup => backup::schemas(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A registered schema and its category.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub category: Category,
    pub schema: Arc<GridSchema>,
}

/// Schemas indexed by lowercased resource type.
///
/// Lookups are case-insensitive; listing returns the canonical spelling.
#[derive(Debug, Default)]
pub struct CatalogRegistry {
    entries: BTreeMap<String, CatalogEntry>,
}

impl CatalogRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in schema.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for category in Category::ALL {
            for schema in category.schemas() {
                registry.register(category, schema);
            }
        }
        tracing::debug!(resource_types = registry.len(), "built resource catalog");
        registry
    }

    /// Process-wide built-in registry, built on first use.
    pub fn shared() -> &'static CatalogRegistry {
        static REGISTRY: OnceLock<CatalogRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::builtin)
    }

    /// Registers a schema, replacing any schema of the same type.
    ///
    /// Returns the replaced schema, if any.
    pub fn register(&mut self, category: Category, schema: GridSchema) -> Option<Arc<GridSchema>> {
        let key = schema.resource_type.to_lowercase();
        let entry = CatalogEntry {
            category,
            schema: Arc::new(schema),
        };
        self.entries.insert(key, entry).map(|old| old.schema)
    }

    /// Finds the entry for a resource type (case-insensitive).
    pub fn find(&self, resource_type: &str) -> Option<&CatalogEntry> {
        self.entries.get(&resource_type.trim().to_lowercase())
    }

    /// Schema for a resource type.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownResourceType`] when nothing is registered.
    pub fn get(&self, resource_type: &str) -> Result<Arc<GridSchema>> {
        self.find(resource_type)
            .map(|entry| Arc::clone(&entry.schema))
            .ok_or_else(|| GridError::UnknownResourceType {
                resource_type: resource_type.to_string(),
            })
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.find(resource_type).is_some()
    }

    /// Canonical resource type names in case-insensitive order.
    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.entries
            .values()
            .map(|entry| entry.schema.resource_type.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Entries in one category.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .values()
            .filter(move |entry| entry.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_model::FieldDescriptor;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = CatalogRegistry::builtin();
        for name in ["S3Bucket", "s3bucket", " S3BUCKET "] {
            assert_eq!(registry.get(name).unwrap().resource_type, "S3Bucket");
        }
    }

    #[test]
    fn unknown_type_is_an_error() {
        let err = CatalogRegistry::builtin().get("Lambda").unwrap_err();
        assert!(matches!(err, GridError::UnknownResourceType { ref resource_type } if resource_type == "Lambda"));
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = CatalogRegistry::new();
        let first = GridSchema::new("Custom", "Custom")
            .field(FieldDescriptor::text("id", "ID").required());
        assert!(registry.register(Category::Compute, first.clone()).is_none());
        let replaced = registry.register(Category::Storage, first);
        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("custom").unwrap().category, Category::Storage);
    }

    #[test]
    fn every_category_has_entries() {
        let registry = CatalogRegistry::builtin();
        for category in Category::ALL {
            assert!(registry.by_category(category).next().is_some(), "{category}");
        }
    }
}
