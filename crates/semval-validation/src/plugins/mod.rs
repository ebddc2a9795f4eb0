//! Validation plugins
//!
//! A plugin inspects one document typed as a root class and produces a
//! [`ValidationResult`]. Built-in plugins walk the document through the
//! schema; other plugins (such as structural checks) are registered by the
//! embedding application.

pub mod backref;
pub mod reference;
pub mod unique;

pub use backref::BackRefValidationPlugin;
pub use reference::RefValidationPlugin;
pub use unique::UniqueValidationPlugin;

use crate::report::ValidationResult;
use crate::walker::DEFAULT_MAX_DEPTH;
use crate::{Error, Result};
use semval_schema::SchemaProvider;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A named validation step
pub trait ValidationPlugin: Send + Sync {
    /// Name reported in [`ValidationResult::plugin_name`]
    fn name(&self) -> &str;

    /// Validate `data` as an instance of `target_class`.
    ///
    /// Findings are returned as messages. An `Err` means the plugin could not
    /// complete; the orchestrator reports it as a single fatal message.
    fn validate(&self, data: &Value, target_class: &str) -> Result<ValidationResult>;
}

/// Free-form plugin arguments from configuration
pub type PluginArgs = Map<String, Value>;

/// A plugin selected by name, with its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub args: PluginArgs,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: PluginArgs::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.args.insert(key.into(), value);
        self
    }
}

impl From<&str> for PluginSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Shared inputs handed to every plugin constructor
#[derive(Clone)]
pub struct PluginContext {
    pub schema: Arc<dyn SchemaProvider>,
    /// Walk depth limit applied unless a plugin's arguments override it
    pub max_depth: usize,
}

impl PluginContext {
    pub fn new(schema: Arc<dyn SchemaProvider>) -> Self {
        Self {
            schema,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Resolve the walk depth for a built-in plugin.
///
/// Built-ins accept a single optional `max_depth` argument; anything else is
/// rejected so typos in configuration surface early.
pub(crate) fn walk_depth(plugin: &str, context: &PluginContext, args: &PluginArgs) -> Result<usize> {
    if let Some(unknown) = args.keys().find(|key| key.as_str() != "max_depth") {
        return Err(Error::InvalidPluginArgs {
            plugin: plugin.to_string(),
            message: format!("unknown argument '{unknown}'"),
        });
    }

    match args.get("max_depth") {
        None => Ok(context.max_depth),
        Some(value) => value
            .as_u64()
            .and_then(|depth| usize::try_from(depth).ok())
            .ok_or_else(|| Error::InvalidPluginArgs {
                plugin: plugin.to_string(),
                message: format!("max_depth must be a non-negative integer, got {value}"),
            }),
    }
}
