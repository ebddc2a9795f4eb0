//! Validation messages, per-plugin results and the aggregated report
//!
//! These are the shapes persisted as the JSON report:
//!
//! ```json
//! {
//!   "type": "Submission",
//!   "valid": false,
//!   "validation_results": [
//!     {
//!       "plugin_name": "RefValidationPlugin",
//!       "valid": false,
//!       "validation_messages": [
//!         {"severity": "Error", "message": "...", "field": "primary_sample_ref", "value": "S9"}
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Severity of a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    /// The plugin could not finish; its result is incomplete
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("Error"),
            Self::Warning => f.write_str("Warning"),
            Self::Fatal => f.write_str("Fatal"),
        }
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub message: String,
    /// Dotted/indexed path of the offending field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The offending raw value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationMessage {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            field: None,
            value: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, message)
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field.as_deref() {
            Some(field) if !field.is_empty() => {
                write!(f, "[{}] {}: {}", self.severity, field, self.message)
            }
            _ => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Outcome of one plugin run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub plugin_name: String,
    pub valid: bool,
    #[serde(default)]
    pub validation_messages: Vec<ValidationMessage>,
}

impl ValidationResult {
    /// Build a result that is valid exactly when there are no messages
    pub fn from_messages(plugin_name: impl Into<String>, messages: Vec<ValidationMessage>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            valid: messages.is_empty(),
            validation_messages: messages,
        }
    }

    /// A result for a plugin that aborted
    pub fn fatal(plugin_name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::from_messages(
            plugin_name,
            vec![ValidationMessage::fatal(reason.to_string())],
        )
    }

    /// Check whether the plugin aborted
    pub fn is_fatal(&self) -> bool {
        self.validation_messages
            .iter()
            .any(|m| m.severity == Severity::Fatal)
    }
}

/// Aggregated outcome of all plugins for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The validated document, unless excluded to keep reports small
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
    #[serde(rename = "type")]
    pub target_class: String,
    pub valid: bool,
    pub validation_results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Build a report; it is valid exactly when every result is valid
    pub fn new(
        target_class: impl Into<String>,
        object: Option<Value>,
        validation_results: Vec<ValidationResult>,
    ) -> Self {
        Self {
            object,
            target_class: target_class.into(),
            valid: validation_results.iter().all(|r| r.valid),
            validation_results,
        }
    }

    /// All messages of all plugins, in plugin order
    pub fn messages(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.validation_results
            .iter()
            .flat_map(|r| r.validation_messages.iter())
    }

    /// Count messages of a given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.messages().filter(|m| m.severity == severity).count()
    }

    /// Look up the result of a plugin by name
    pub fn result(&self, plugin_name: &str) -> Option<&ValidationResult> {
        self.validation_results
            .iter()
            .find(|r| r.plugin_name == plugin_name)
    }
}
