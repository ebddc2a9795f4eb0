//! Thread-safe cache of loaded schemas

use crate::model::Schema;
use dashmap::DashMap;
use std::sync::Arc;

/// Registry of parsed schemas shared between loaders
#[derive(Debug, Default)]
pub struct ConcurrentSchemaRegistry {
    schemas: DashMap<String, Arc<Schema>>,
}

impl ConcurrentSchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under a key, replacing any previous entry
    pub fn register(&self, key: impl Into<String>, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        self.schemas.insert(key.into(), Arc::clone(&schema));
        schema
    }

    /// Get a schema by key
    pub fn get(&self, key: &str) -> Option<Arc<Schema>> {
        self.schemas.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a schema exists
    pub fn contains(&self, key: &str) -> bool {
        self.schemas.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
