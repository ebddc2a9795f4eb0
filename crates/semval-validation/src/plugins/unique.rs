//! Duplicate identifier detection

use super::{PluginArgs, PluginContext, ValidationPlugin, walk_depth};
use crate::report::{ValidationMessage, ValidationResult};
use crate::value::{IdentifierIndex, display_value};
use crate::walker::{DEFAULT_MAX_DEPTH, walk};
use crate::Result;
use semval_schema::SchemaProvider;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Reports records whose identifier was already used by an earlier record of
/// the same class anywhere in the document
pub struct UniqueValidationPlugin {
    schema: Arc<dyn SchemaProvider>,
    max_depth: usize,
}

impl UniqueValidationPlugin {
    pub const NAME: &'static str = "UniqueValidationPlugin";

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
}

impl ValidationPlugin for UniqueValidationPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, data: &Value, target_class: &str) -> Result<ValidationResult> {
        let schema = self.schema.as_ref();
        let mut seen = IdentifierIndex::new();
        let mut messages = Vec::new();

        for record in walk(schema, data, target_class, self.max_depth) {
            let record = record?;
            let Some(identifier) = record.identifier else {
                continue;
            };

            if seen.insert(record.class_name, identifier) {
                continue;
            }

            let id_field = schema.identifier_field(record.class_name).unwrap_or_default();
            messages.push(
                ValidationMessage::error(format!(
                    "Duplicate value for unique attribute {}({}): {}",
                    record.class_name,
                    id_field,
                    display_value(identifier)
                ))
                .with_field(record.path.to_string())
                .with_value(Value::Object(record.data.clone())),
            );
        }

        debug!(
            plugin = Self::NAME,
            messages = messages.len(),
            "uniqueness check finished"
        );
        Ok(ValidationResult::from_messages(Self::NAME, messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{submission_view, valid_submission};
    use serde_json::json;

    fn plugin() -> UniqueValidationPlugin {
        UniqueValidationPlugin::new(Arc::new(submission_view()))
    }

    #[test]
    fn test_unique_identifiers_are_valid() {
        let result = plugin().validate(&valid_submission(), "Submission").unwrap();
        assert_eq!(result.plugin_name, "UniqueValidationPlugin");
        assert!(result.valid);
    }

    #[test]
    fn test_duplicate_reported_once_at_second_record() {
        let data = json!({
            "samples": [
                {"sample_id": "S1"},
                {"sample_id": "S1", "title": "again"},
                {"sample_id": "S2"}
            ]
        });

        let result = plugin().validate(&data, "Submission").unwrap();
        assert!(!result.valid);
        assert_eq!(result.validation_messages.len(), 1);

        let message = &result.validation_messages[0];
        assert_eq!(
            message.message,
            "Duplicate value for unique attribute Sample(sample_id): S1"
        );
        assert_eq!(message.field.as_deref(), Some("samples.1"));
        assert_eq!(message.value, Some(json!({"sample_id": "S1", "title": "again"})));
    }

    #[test]
    fn test_duplicates_are_global_not_per_parent() {
        // Donors embedded in different samples still share one scope
        let data = json!({
            "samples": [
                {"sample_id": "S1", "donor": {"donor_id": "D1"}},
                {"sample_id": "S2", "donor": {"donor_id": "D1"}}
            ],
            "donors": [{"donor_id": "D1"}]
        });

        let result = plugin().validate(&data, "Submission").unwrap();
        let fields: Vec<_> = result
            .validation_messages
            .iter()
            .filter_map(|m| m.field.as_deref())
            .collect();
        assert_eq!(fields, vec!["samples.1.donor", "donors.0"]);
    }

    #[test]
    fn test_same_identifier_in_different_classes_is_allowed() {
        let data = json!({
            "samples": [{"sample_id": "X"}],
            "donors": [{"donor_id": "X"}]
        });
        assert!(plugin().validate(&data, "Submission").unwrap().valid);
    }

    #[test]
    fn test_records_without_identifier_are_not_tracked() {
        let data = json!({
            "samples": [{"title": "a"}, {"title": "a"}, {"sample_id": null}, {"sample_id": null}]
        });
        assert!(plugin().validate(&data, "Submission").unwrap().valid);
    }

    #[test]
    fn test_three_copies_yield_two_messages() {
        let data = json!({
            "samples": [{"sample_id": "S1"}, {"sample_id": "S1"}, {"sample_id": "S1"}]
        });
        let result = plugin().validate(&data, "Submission").unwrap();
        assert_eq!(result.validation_messages.len(), 2);
    }
}
