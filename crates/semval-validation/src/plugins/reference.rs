//! Dangling reference detection
//!
//! Identifiers are collected in a first walk and references are checked in a
//! second one, so a reference may point at a record that appears later in the
//! document or under a different parent.

use super::{PluginArgs, PluginContext, ValidationPlugin, walk_depth};
use crate::report::{ValidationMessage, ValidationResult};
use crate::value::{FieldValue, IdentifierIndex, display_value, identifier_key};
use crate::walker::{DEFAULT_MAX_DEPTH, walk};
use crate::Result;
use semval_schema::SchemaProvider;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Reports reference fields whose values match no inline record of the
/// field's target class
pub struct RefValidationPlugin {
    schema: Arc<dyn SchemaProvider>,
    max_depth: usize,
}

impl RefValidationPlugin {
    pub const NAME: &'static str = "RefValidationPlugin";

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

    fn collect_identifiers<'a>(
        &'a self,
        data: &'a Value,
        target_class: &'a str,
    ) -> Result<IdentifierIndex<'a>> {
        let mut index = IdentifierIndex::new();
        for record in walk(self.schema.as_ref(), data, target_class, self.max_depth) {
            let record = record?;
            if let Some(identifier) = record.identifier {
                index.insert(record.class_name, identifier);
            }
        }
        Ok(index)
    }
}

/// Render the unresolved values of one field as a single message
fn unresolved_message(path: &str, target_class: &str, unresolved: &[&Value]) -> String {
    let quoted = unresolved
        .iter()
        .map(|value| format!("'{}'", display_value(value)))
        .collect::<Vec<_>>()
        .join(", ");

    if unresolved.len() == 1 {
        format!("Unknown reference in {path}: {quoted} does not match any {target_class} identifier")
    } else {
        format!("Unknown references in {path}: {quoted} do not match any {target_class} identifier")
    }
}

impl ValidationPlugin for RefValidationPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, data: &Value, target_class: &str) -> Result<ValidationResult> {
        let index = self.collect_identifiers(data, target_class)?;
        let mut messages = Vec::new();

        for record in walk(self.schema.as_ref(), data, target_class, self.max_depth) {
            let record = record?;

            for field in record.reference_fields(self.schema.as_ref()) {
                let mut seen = HashSet::new();
                let unresolved: Vec<&Value> = FieldValue::of(field.value)
                    .values()
                    .iter()
                    .filter(|value| !value.is_null())
                    .filter(|value| !index.contains(field.target_class, value))
                    .filter(|value| seen.insert(identifier_key(value)))
                    .collect();

                if unresolved.is_empty() {
                    continue;
                }

                let path = record.path.field(field.name).to_string();
                messages.push(
                    ValidationMessage::error(unresolved_message(
                        &path,
                        field.target_class,
                        &unresolved,
                    ))
                    .with_field(path)
                    .with_value(field.value.clone()),
                );
            }
        }

        debug!(
            plugin = Self::NAME,
            messages = messages.len(),
            "reference check finished"
        );
        Ok(ValidationResult::from_messages(Self::NAME, messages))
    }
}
