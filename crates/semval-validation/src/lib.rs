#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # semval-validation
//!
//! Semantic validation of schema-described documents.
//!
//! A document is a JSON value whose records are typed by a schema. This crate
//! walks the document through the schema and checks properties a shape
//! checker cannot see: references that point at no record, identifiers used
//! twice, and identifiers nothing refers to.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use semval_schema::{ClassDefinition, Schema, SchemaView, SlotDefinition};
//! use semval_validation::{PluginRegistry, PluginSpec, Validator, ValidatorConfig};
//! use serde_json::json;
//!
//! let schema = Schema::new("submission")
//!     .with_class(ClassDefinition::new("Submission").with_slots(["samples", "primary_sample_ref"]))
//!     .with_class(ClassDefinition::new("Sample").with_slots(["sample_id"]))
//!     .with_slot(SlotDefinition::new("samples").range("Sample").inlined_as_list(true))
//!     .with_slot(SlotDefinition::new("primary_sample_ref").range("Sample"))
//!     .with_slot(SlotDefinition::new("sample_id").identifier(true));
//! let view = Arc::new(SchemaView::new(schema).unwrap());
//!
//! let validator = Validator::new(
//!     view,
//!     &[PluginSpec::from("RefValidationPlugin")],
//!     &PluginRegistry::with_builtins(),
//!     ValidatorConfig::default(),
//! )
//! .unwrap();
//!
//! let data = json!({"samples": [{"sample_id": "S1"}], "primary_sample_ref": "S9"});
//! let report = validator.validate(&data, "Submission").unwrap();
//! assert!(!report.valid);
//! ```

pub mod engine;
pub mod path;
pub mod plugins;
pub mod registry;
pub mod report;
pub mod value;
pub mod walker;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types
pub use engine::{Validator, ValidatorConfig};
pub use path::{DataPath, PathSegment};
pub use plugins::{
    BackRefValidationPlugin, PluginArgs, PluginContext, PluginSpec, RefValidationPlugin,
    UniqueValidationPlugin, ValidationPlugin,
};
pub use registry::{DEFAULT_PLUGINS, PluginConstructor, PluginRegistry};
pub use report::{Severity, ValidationMessage, ValidationReport, ValidationResult};
pub use walker::{ObjectWalker, Record, ReferenceField, SlotRef, walk};

use thiserror::Error;

/// Errors that can occur during validation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Invalid arguments for plugin {plugin}: {message}")]
    InvalidPluginArgs { plugin: String, message: String },

    #[error("Maximum nesting depth {limit} exceeded at '{path}'")]
    DepthExceeded { path: String, limit: usize },

    /// Failure inside a plugin itself, also used by plugins defined outside
    /// this crate
    #[error("Plugin {plugin} failed: {message}")]
    Plugin { plugin: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
