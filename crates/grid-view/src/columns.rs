//! Column visibility with persisted per-type overrides.
//!
//! Required columns are always visible. The selection is kept as a set and
//! rendered in catalog order, never in toggle order.

use std::collections::BTreeSet;

use grid_model::{FieldDescriptor, GridSchema, PreferenceStore};
use serde_json::Value;

/// Preference namespace prefix for persisted column selections.
pub const COLUMN_NAMESPACE_PREFIX: &str = "inventory-grid.columns";

pub fn column_namespace(resource_type: &str) -> String {
    format!("{COLUMN_NAMESPACE_PREFIX}.{resource_type}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnVisibility {
    resource_type: String,
    /// Every declared key in catalog order.
    catalog: Vec<String>,
    required: BTreeSet<String>,
    visible: BTreeSet<String>,
    /// Selection captured by `begin_edit`, restored by `cancel_edit`.
    snapshot: Option<BTreeSet<String>>,
}

impl ColumnVisibility {
    /// Schema defaults plus required columns.
    pub fn new(schema: &GridSchema) -> Self {
        let required = schema.required_keys();
        let visible = schema
            .default_visible_keys()
            .union(&required)
            .cloned()
            .collect();
        Self {
            resource_type: schema.resource_type.clone(),
            catalog: schema.keys().map(str::to_string).collect(),
            required,
            visible,
            snapshot: None,
        }
    }

    /// Schema defaults overridden by a persisted selection, if one is readable.
    pub fn load(schema: &GridSchema, prefs: &dyn PreferenceStore) -> Self {
        let mut columns = Self::new(schema);
        let namespace = column_namespace(&schema.resource_type);

        let Some(stored) = prefs.get(&namespace) else {
            return columns;
        };
        match serde_json::from_str::<Value>(&stored) {
            Ok(Value::Array(keys)) => {
                let persisted: BTreeSet<String> = keys
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|key| columns.is_declared(key))
                    .map(str::to_string)
                    .collect();
                columns.visible = persisted.union(&columns.required).cloned().collect();
            }
            Ok(_) | Err(_) => {
                tracing::debug!(%namespace, "ignoring unreadable column preference");
            }
        }
        columns
    }

    fn is_declared(&self, key: &str) -> bool {
        self.catalog.iter().any(|known| known == key)
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.contains(key)
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required.contains(key)
    }

    /// Flip a column. Required and undeclared keys are left alone; returns
    /// whether anything changed.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.is_required(key) || !self.is_declared(key) {
            return false;
        }
        if !self.visible.remove(key) {
            self.visible.insert(key.to_string());
        }
        true
    }

    /// Make a column visible; undeclared keys are ignored.
    pub fn show(&mut self, key: &str) -> bool {
        if !self.is_declared(key) {
            return false;
        }
        self.visible.insert(key.to_string())
    }

    /// Hide a column; required keys stay visible.
    pub fn hide(&mut self, key: &str) -> bool {
        !self.is_required(key) && self.visible.remove(key)
    }

    pub fn select_all(&mut self) {
        self.visible = self.catalog.iter().cloned().collect();
    }

    /// Hide everything except required columns.
    pub fn deselect_all(&mut self) {
        self.visible = self.required.clone();
    }

    pub fn begin_edit(&mut self) {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.visible.clone());
        }
    }

    pub fn is_editing(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Restore the selection captured by `begin_edit`.
    pub fn cancel_edit(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.visible = snapshot;
        }
    }

    /// Persist the selection and leave edit mode. Persistence failures keep
    /// the in-memory selection.
    pub fn apply(&mut self, prefs: &dyn PreferenceStore) {
        self.snapshot = None;
        let namespace = column_namespace(&self.resource_type);
        let encoded = Value::from(self.visible_keys()).to_string();
        if let Err(error) = prefs.set(&namespace, &encoded) {
            tracing::debug!(%namespace, %error, "column preference not saved");
        }
    }

    /// Visible keys in catalog order.
    pub fn visible_keys(&self) -> Vec<&str> {
        self.catalog
            .iter()
            .filter(|key| self.visible.contains(*key))
            .map(String::as_str)
            .collect()
    }

    /// Visible field descriptors in catalog order.
    pub fn visible_fields<'s>(&self, schema: &'s GridSchema) -> Vec<&'s FieldDescriptor> {
        schema
            .fields
            .iter()
            .filter(|field| self.visible.contains(&field.key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_model::{GridError, MemoryPreferences, Result};

    fn schema() -> GridSchema {
        GridSchema::new("VPC", "VPCs")
            .field(FieldDescriptor::text("vpcId", "VPC ID").required())
            .field(FieldDescriptor::text("vpcName", "Name"))
            .field(FieldDescriptor::text("cidrBlock", "CIDR"))
            .field(FieldDescriptor::tags("tags", "Tags").hidden())
    }

    struct FailingPreferences;

    impl PreferenceStore for FailingPreferences {
        fn get(&self, _namespace: &str) -> Option<String> {
            None
        }

        fn set(&self, namespace: &str, _value: &str) -> Result<()> {
            Err(GridError::Preference {
                namespace: namespace.to_string(),
                message: "read-only".to_string(),
            })
        }
    }

    #[test]
    fn defaults_exclude_hidden_fields() {
        let columns = ColumnVisibility::new(&schema());
        assert_eq!(columns.visible_keys(), ["vpcId", "vpcName", "cidrBlock"]);
    }

    #[test]
    fn persisted_selection_keeps_required_and_drops_unknown() {
        let prefs = MemoryPreferences::new();
        prefs
            .set("inventory-grid.columns.VPC", r#"["tags", "bogus", "cidrBlock"]"#)
            .unwrap();
        let columns = ColumnVisibility::load(&schema(), &prefs);
        assert_eq!(columns.visible_keys(), ["vpcId", "cidrBlock", "tags"]);
    }

    #[test]
    fn corrupted_preference_falls_back_to_defaults() {
        let prefs = MemoryPreferences::new();
        prefs.set("inventory-grid.columns.VPC", "{not json").unwrap();
        let columns = ColumnVisibility::load(&schema(), &prefs);
        assert_eq!(columns, ColumnVisibility::new(&schema()));
    }

    #[test]
    fn edit_then_cancel_restores() {
        let mut columns = ColumnVisibility::new(&schema());
        columns.begin_edit();
        columns.deselect_all();
        assert_eq!(columns.visible_keys(), ["vpcId"]);
        columns.cancel_edit();
        assert_eq!(columns.visible_keys(), ["vpcId", "vpcName", "cidrBlock"]);
        assert!(!columns.is_editing());
    }

    #[test]
    fn apply_persists_in_catalog_order() {
        let prefs = MemoryPreferences::new();
        let mut columns = ColumnVisibility::new(&schema());
        columns.begin_edit();
        columns.toggle("tags");
        columns.toggle("vpcName");
        columns.apply(&prefs);
        assert_eq!(
            prefs.get("inventory-grid.columns.VPC").as_deref(),
            Some(r#"["vpcId","cidrBlock","tags"]"#)
        );
        assert!(!columns.is_editing());
    }

    #[test]
    fn failed_persistence_keeps_selection() {
        let mut columns = ColumnVisibility::new(&schema());
        columns.hide("cidrBlock");
        columns.apply(&FailingPreferences);
        assert!(!columns.is_visible("cidrBlock"));
    }

    #[test]
    fn select_all_shows_hidden_fields() {
        let mut columns = ColumnVisibility::new(&schema());
        columns.select_all();
        assert_eq!(columns.visible_fields(&schema()).len(), 4);
    }
}
