//! Component registry
//!
//! The single dispatch table from `(namespace, type)` to implementation.
//! It knows nothing about loading: `resolve` is a pure read over whatever
//! has been registered so far.

use crate::library::LibraryBundle;
use crate::record::ComponentRecord;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use trellis_core::{ComponentKey, Result};

/// Registry that holds every registered component record
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: HashMap<ComponentKey, Arc<ComponentRecord>>,
    /// Type names registered under each namespace
    namespaces: HashMap<String, BTreeSet<String>>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record, replacing any previous record for the same key
    pub fn register(&mut self, record: ComponentRecord) {
        let key = record.key.clone();
        self.namespaces
            .entry(key.namespace.clone())
            .or_default()
            .insert(key.type_name.clone());
        self.components.insert(key, Arc::new(record));
    }

    /// Register every record of a bundle. Returns the number registered.
    ///
    /// Records keyed under another namespace are skipped: a bundle may only
    /// make its own namespace visible.
    pub fn register_bundle(&mut self, bundle: LibraryBundle) -> usize {
        let LibraryBundle {
            namespace, records, ..
        } = bundle;
        let mut count = 0;
        for record in records {
            if record.key.namespace == namespace {
                self.register(record);
                count += 1;
            }
        }
        count
    }

    /// Look up a record by key
    pub fn resolve(&self, key: &ComponentKey) -> Option<Arc<ComponentRecord>> {
        self.components.get(key).cloned()
    }

    /// Look up a record by namespace and type name
    pub fn get(&self, namespace: &str, type_name: &str) -> Option<Arc<ComponentRecord>> {
        self.resolve(&ComponentKey::new(namespace, type_name))
    }

    /// True if at least one component is registered under the namespace
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Remove every record of a namespace. Returns the number removed.
    pub fn unregister_namespace(&mut self, namespace: &str) -> usize {
        let Some(types) = self.namespaces.remove(namespace) else {
            return 0;
        };
        for type_name in &types {
            self.components
                .remove(&ComponentKey::new(namespace, type_name.as_str()));
        }
        types.len()
    }

    /// Sorted type names registered under a namespace
    pub fn component_names(&self, namespace: &str) -> Vec<&str> {
        self.namespaces
            .get(namespace)
            .map(|types| types.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Sorted list of registered namespaces
    pub fn namespaces(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.namespaces.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Register a library from a TOML manifest string. Returns its namespace.
    pub fn load_library_string(&mut self, content: &str) -> Result<String> {
        let bundle = LibraryBundle::from_manifest_str(content)?;
        let namespace = bundle.namespace.clone();
        self.register_bundle(bundle);
        Ok(namespace)
    }

    /// Register a library from a TOML manifest file. Returns its namespace.
    pub fn load_library_file<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let content = fs::read_to_string(path)?;
        self.load_library_string(&content)
    }
}
