#![deny(rust_2018_idioms)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # semval-schema
//!
//! Schema model, loader, and inheritance/override resolution for semval.
//!
//! Schemas describe classes (record types) and slots (fields). A class can
//! inherit slots through `is_a` and `mixins`, declare class-local
//! `attributes`, and override global slot properties through `slot_usage`.
//! [`SchemaView`] resolves all of that once and answers lookups through the
//! [`SchemaProvider`] trait, which is all the validators ever see.

pub mod inheritance;
pub mod loader;
pub mod model;
pub mod provider;
pub mod registry;
pub mod view;

pub use loader::SchemaLoader;
pub use model::{ClassDefinition, Schema, SlotDefinition};
pub use provider::SchemaProvider;
pub use registry::ConcurrentSchemaRegistry;
pub use view::SchemaView;

use thiserror::Error;

/// Errors that can occur when working with schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("Inheritance error: {0}")]
    Inheritance(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
