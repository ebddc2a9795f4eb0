//! Static plugin registry
//!
//! Plugins are looked up by name from configuration. The registry maps each
//! name to a constructor; unknown names are rejected before anything runs.

use crate::plugins::{
    BackRefValidationPlugin, PluginArgs, PluginContext, RefValidationPlugin,
    UniqueValidationPlugin, ValidationPlugin,
};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds a plugin from the shared context and its own arguments
pub type PluginConstructor =
    fn(&PluginContext, &PluginArgs) -> Result<Arc<dyn ValidationPlugin>>;

/// Plugins run when none are configured
pub const DEFAULT_PLUGINS: [&str; 2] = [RefValidationPlugin::NAME, UniqueValidationPlugin::NAME];

/// Name to constructor mapping
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    constructors: BTreeMap<String, PluginConstructor>,
}

impl PluginRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the plugins shipped with this crate
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(RefValidationPlugin::NAME, RefValidationPlugin::create);
        registry.register(UniqueValidationPlugin::NAME, UniqueValidationPlugin::create);
        registry.register(BackRefValidationPlugin::NAME, BackRefValidationPlugin::create);
        registry
    }

    /// Add or replace a plugin constructor
    pub fn register(&mut self, name: impl Into<String>, constructor: PluginConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Construct a plugin by name
    pub fn create(
        &self,
        name: &str,
        context: &PluginContext,
        args: &PluginArgs,
    ) -> Result<Arc<dyn ValidationPlugin>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| Error::UnknownPlugin(name.to_string()))?;
        constructor(context, args)
    }
}
