//! Collaborator interfaces: resource store and preference store.
//!
//! The engine depends on exactly these operations and nothing about how they
//! are transported.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::error::{GridError, Result};
use crate::record::RawRecord;

/// Source of raw records, possibly cached.
pub trait ResourceStore: Send + Sync {
    /// List every record of a resource type.
    fn list_by_type(&self, resource_type: &str) -> Result<Vec<RawRecord>>;

    /// Drop any cached data for a resource type so the next list refetches.
    fn invalidate(&self, resource_type: &str);
}

impl<S: ResourceStore + ?Sized> ResourceStore for Arc<S> {
    fn list_by_type(&self, resource_type: &str) -> Result<Vec<RawRecord>> {
        (**self).list_by_type(resource_type)
    }

    fn invalidate(&self, resource_type: &str) {
        (**self).invalidate(resource_type);
    }
}

/// Namespaced key-value persistence.
///
/// Both operations may fail; callers treat failures as "no preference".
pub trait PreferenceStore {
    fn get(&self, namespace: &str) -> Option<String>;

    fn set(&self, namespace: &str, value: &str) -> Result<()>;
}

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, namespace: &str) -> Option<String> {
        self.entries.lock().ok()?.get(namespace).cloned()
    }

    fn set(&self, namespace: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| GridError::Preference {
            namespace: namespace.to_string(),
            message: "preference lock poisoned".to_string(),
        })?;
        entries.insert(namespace.to_string(), value.to_string());
        Ok(())
    }
}

/// Memoizes another store's listings until invalidated.
#[derive(Debug)]
pub struct CachedStore<S> {
    inner: S,
    cache: Mutex<HashMap<String, Vec<RawRecord>>>,
}

impl<S> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ResourceStore> ResourceStore for CachedStore<S> {
    fn list_by_type(&self, resource_type: &str) -> Result<Vec<RawRecord>> {
        if let Some(records) = self
            .cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(resource_type).cloned())
        {
            tracing::trace!(resource_type, "serving cached records");
            return Ok(records);
        }

        let records = self.inner.list_by_type(resource_type)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(resource_type.to_string(), records.clone());
        }
        Ok(records)
    }

    fn invalidate(&self, resource_type: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(resource_type);
        }
        self.inner.invalidate(resource_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    impl ResourceStore for CountingStore {
        fn list_by_type(&self, _resource_type: &str) -> Result<Vec<RawRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![RawRecord::new()])
        }

        fn invalidate(&self, _resource_type: &str) {}
    }

    #[test]
    fn cached_store_memoizes_until_invalidated() {
        let store = CachedStore::new(CountingStore::default());
        store.list_by_type("VPC").unwrap();
        store.list_by_type("VPC").unwrap();
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 1);

        store.invalidate("VPC");
        store.list_by_type("VPC").unwrap();
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn memory_preferences_round_trip() {
        let prefs = MemoryPreferences::new();
        assert_eq!(prefs.get("ns"), None);
        prefs.set("ns", "[\"a\"]").unwrap();
        assert_eq!(prefs.get("ns").as_deref(), Some("[\"a\"]"));
    }
}
