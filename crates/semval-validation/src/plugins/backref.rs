//! Unused identifier detection
//!
//! The mirror image of the reference check: an inline record whose class is
//! meant to be referenced, but whose identifier no reference field mentions.

use super::{PluginArgs, PluginContext, ValidationPlugin, walk_depth};
use crate::report::{ValidationMessage, ValidationResult};
use crate::value::{FieldValue, IdentifierIndex, display_value};
use crate::walker::{DEFAULT_MAX_DEPTH, walk};
use crate::Result;
use semval_schema::SchemaProvider;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Classes in this subset may legitimately go unreferenced
pub const EXCLUDE_FROM_REF: &str = "exclude_from_ref";

/// Reports records that nothing in the document refers to
pub struct BackRefValidationPlugin {
    schema: Arc<dyn SchemaProvider>,
    max_depth: usize,
}

impl BackRefValidationPlugin {
    pub const NAME: &'static str = "BackRefValidationPlugin";

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

    /// Registry constructor
    pub fn create(context: &PluginContext, args: &PluginArgs) -> Result<Arc<dyn ValidationPlugin>> {
        let max_depth = walk_depth(Self::NAME, context, args)?;
        Ok(Arc::new(
            Self::new(Arc::clone(&context.schema)).with_max_depth(max_depth),
        ))
    }

    /// Classes that some slot of the schema refers to by identifier
    fn referable_classes(&self) -> BTreeSet<&str> {
        let schema = self.schema.as_ref();
        schema
            .class_names()
            .into_iter()
            .flat_map(|class| {
                schema
                    .slot_names(class)
                    .into_iter()
                    .filter_map(move |slot| schema.field_definition(class, slot))
            })
            .filter(|slot| !schema.is_inline(slot))
            .filter_map(|slot| schema.range_class(slot))
            .filter(|class| !schema.in_subset(class, EXCLUDE_FROM_REF))
            .collect()
    }
}

impl ValidationPlugin for BackRefValidationPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, data: &Value, target_class: &str) -> Result<ValidationResult> {
        let schema = self.schema.as_ref();
        let referable = self.referable_classes();

        let mut referenced = IdentifierIndex::new();
        for record in walk(schema, data, target_class, self.max_depth) {
            let record = record?;
            for field in record.reference_fields(schema) {
                for value in FieldValue::of(field.value).values() {
                    referenced.insert(field.target_class, value);
                }
            }
        }

        let mut messages = Vec::new();
        for record in walk(schema, data, target_class, self.max_depth) {
            let record = record?;
            let Some(identifier) = record.identifier else {
                continue;
            };
            if !referable.contains(record.class_name)
                || referenced.contains(record.class_name, identifier)
            {
                continue;
            }

            messages.push(
                ValidationMessage::error(format!(
                    "Unused object identifier {}",
                    display_value(identifier)
                ))
                .with_field(record.path.to_string())
                .with_value(Value::Object(record.data.clone())),
            );
        }

        debug!(
            plugin = Self::NAME,
            messages = messages.len(),
            "back-reference check finished"
        );
        Ok(ValidationResult::from_messages(Self::NAME, messages))
    }
}
