//! Structural validation against a JSON Schema
//!
//! Complements the semantic plugins: shape, types and required fields are
//! checked here, references and identifiers are not.

use jsonschema::Validator as JsonSchemaValidator;
use semval_validation::{
    Error, PluginArgs, PluginContext, ValidationMessage, ValidationPlugin, ValidationResult,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Runs a compiled JSON Schema over the whole document
pub struct JsonSchemaValidationPlugin {
    validator: JsonSchemaValidator,
}

impl JsonSchemaValidationPlugin {
    pub const NAME: &'static str = "JsonSchemaValidationPlugin";

    /// Compile a JSON Schema document
    pub fn new(schema: &Value) -> semval_validation::Result<Self> {
        let validator = jsonschema::validator_for(schema).map_err(|e| Error::Plugin {
            plugin: Self::NAME.to_string(),
            message: format!("cannot compile JSON Schema: {e}"),
        })?;
        Ok(Self { validator })
    }

    /// Read and compile a JSON Schema from a JSON or YAML file
    pub fn from_file(path: &Path) -> semval_validation::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| invalid_args(format!("cannot read {}: {e}", path.display())))?;
        let schema: Value = if is_yaml(path) {
            serde_yaml::from_str(&text).map_err(|e| invalid_args(e.to_string()))?
        } else {
            serde_json::from_str(&text).map_err(|e| invalid_args(e.to_string()))?
        };
        debug!("Loaded JSON Schema from {}", path.display());
        Self::new(&schema)
    }

    /// Registry constructor; expects a `schema` argument holding a file path
    pub fn create(
        _context: &PluginContext,
        args: &PluginArgs,
    ) -> semval_validation::Result<Arc<dyn ValidationPlugin>> {
        if let Some(unknown) = args.keys().find(|key| key.as_str() != "schema") {
            return Err(invalid_args(format!("unknown argument '{unknown}'")));
        }
        let path = args
            .get("schema")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_args("missing 'schema' argument (path to a JSON Schema)"))?;
        Ok(Arc::new(Self::from_file(Path::new(path))?))
    }
}

fn invalid_args(message: impl Into<String>) -> Error {
    Error::InvalidPluginArgs {
        plugin: JsonSchemaValidationPlugin::NAME.to_string(),
        message: message.into(),
    }
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

/// Convert a JSON pointer (`/samples/0/id`) to a dotted path (`samples.0.id`)
fn pointer_to_path(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

impl ValidationPlugin for JsonSchemaValidationPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, data: &Value, _target_class: &str) -> semval_validation::Result<ValidationResult> {
        let messages = self
            .validator
            .iter_errors(data)
            .map(|e| {
                ValidationMessage::error(e.to_string())
                    .with_field(pointer_to_path(&e.instance_path.to_string()))
                    .with_value(e.instance.clone().into_owned())
            })
            .collect();
        Ok(ValidationResult::from_messages(Self::NAME, messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample_schema() -> Value {
        json!({
            "type": "object",
            "required": ["samples"],
            "properties": {
                "samples": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["sample_id"],
                        "properties": {"sample_id": {"type": "string"}}
                    }
                }
            }
        })
    }

    #[test]
    fn test_pointer_to_path() {
        assert_eq!(pointer_to_path(""), "");
        assert_eq!(pointer_to_path("/samples/0/sample_id"), "samples.0.sample_id");
        assert_eq!(pointer_to_path("/a~1b/c~0d"), "a/b.c~d");
    }

    #[test]
    fn test_valid_document() {
        let plugin = JsonSchemaValidationPlugin::new(&sample_schema()).unwrap();
        let result = plugin
            .validate(&json!({"samples": [{"sample_id": "S1"}]}), "Submission")
            .unwrap();
        assert!(result.valid);
        assert_eq!(result.plugin_name, JsonSchemaValidationPlugin::NAME);
    }

    #[test]
    fn test_violation_carries_path_and_value() {
        let plugin = JsonSchemaValidationPlugin::new(&sample_schema()).unwrap();
        let result = plugin
            .validate(&json!({"samples": [{"sample_id": 7}]}), "Submission")
            .unwrap();

        assert!(!result.valid);
        assert_eq!(result.validation_messages.len(), 1);
        let message = &result.validation_messages[0];
        assert_eq!(message.field.as_deref(), Some("samples.0.sample_id"));
        assert_eq!(message.value, Some(json!(7)));
    }

    #[test]
    fn test_create_requires_schema_argument() {
        let context = PluginContext::new(Arc::new(
            semval_schema::SchemaView::new(semval_schema::Schema::new("empty")).unwrap(),
        ));
        let err = JsonSchemaValidationPlugin::create(&context, &PluginArgs::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("missing 'schema'"));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "type: object\nrequired: [title]").unwrap();

        let plugin = JsonSchemaValidationPlugin::from_file(file.path()).unwrap();
        let result = plugin.validate(&json!({}), "Submission").unwrap();
        assert_eq!(result.validation_messages.len(), 1);
        assert_eq!(result.validation_messages[0].field.as_deref(), Some(""));
    }

    #[test]
    fn test_invalid_schema_is_rejected() {
        let result = JsonSchemaValidationPlugin::new(&json!({"type": 12}));
        assert!(matches!(result, Err(Error::Plugin { .. })));
    }
}
