//! Validation orchestrator
//!
//! Runs the configured plugins in order over one document and folds their
//! results into a [`ValidationReport`]. A plugin that fails is reported as a
//! single fatal message; the remaining plugins still run.

use crate::plugins::{PluginContext, PluginSpec, ValidationPlugin};
use crate::registry::PluginRegistry;
use crate::report::{ValidationReport, ValidationResult};
use crate::walker::DEFAULT_MAX_DEPTH;
use crate::{Error, Result};
use semval_schema::SchemaProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Maximum inline nesting depth for schema walks
    pub max_depth: usize,
    /// Embed the validated document in the report
    pub include_object: bool,
    /// Run plugins on blocking tasks in parallel
    pub concurrent: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_object: false,
            concurrent: false,
        }
    }
}

/// Runs a fixed list of plugins against documents
pub struct Validator {
    schema: Arc<dyn SchemaProvider>,
    plugins: Vec<Arc<dyn ValidationPlugin>>,
    config: ValidatorConfig,
}

impl Validator {
    /// Build plugins from their specs.
    ///
    /// Every name is checked against the registry before any plugin is
    /// constructed, so a typo fails without side effects.
    pub fn new(
        schema: Arc<dyn SchemaProvider>,
        specs: &[PluginSpec],
        registry: &PluginRegistry,
        config: ValidatorConfig,
    ) -> Result<Self> {
        if let Some(unknown) = specs.iter().find(|spec| !registry.contains(&spec.name)) {
            return Err(Error::UnknownPlugin(unknown.name.clone()));
        }

        let context = PluginContext::new(Arc::clone(&schema)).with_max_depth(config.max_depth);
        let plugins = specs
            .iter()
            .map(|spec| registry.create(&spec.name, &context, &spec.args))
            .collect::<Result<Vec<_>>>()?;

        debug!("Configured {} validation plugins", plugins.len());
        Ok(Self::with_plugins(schema, plugins, config))
    }

    /// Use already constructed plugins
    pub fn with_plugins(
        schema: Arc<dyn SchemaProvider>,
        plugins: Vec<Arc<dyn ValidationPlugin>>,
        config: ValidatorConfig,
    ) -> Self {
        Self {
            schema,
            plugins,
            config,
        }
    }

    /// Names of the configured plugins, in run order
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    fn check_target(&self, target_class: &str) -> Result<()> {
        if self.schema.has_class(target_class) {
            Ok(())
        } else {
            Err(Error::UnknownClass(target_class.to_string()))
        }
    }

    fn report(&self, data: &Value, target_class: &str, results: Vec<ValidationResult>) -> ValidationReport {
        let object = self.config.include_object.then(|| data.clone());
        let report = ValidationReport::new(target_class, object, results);
        info!(
            target_class,
            valid = report.valid,
            messages = report.messages().count(),
            "Validation finished"
        );
        report
    }

    /// Run every plugin in order on the current thread.
    ///
    /// A plugin that errors or panics is reported as a fatal result for that
    /// plugin only.
    pub fn validate(&self, data: &Value, target_class: &str) -> Result<ValidationReport> {
        self.check_target(target_class)?;
        info!(
            target_class,
            plugins = self.plugins.len(),
            "Validating document"
        );

        let results = self
            .plugins
            .iter()
            .map(|plugin| run_plugin(plugin.as_ref(), data, target_class))
            .collect();

        Ok(self.report(data, target_class, results))
    }

    /// Run every plugin on its own blocking task.
    ///
    /// Results keep configuration order. A plugin that panics is reported as
    /// a fatal result for that plugin only.
    pub async fn validate_concurrent(
        &self,
        data: Arc<Value>,
        target_class: &str,
    ) -> Result<ValidationReport> {
        self.check_target(target_class)?;
        info!(
            target_class,
            plugins = self.plugins.len(),
            "Validating document concurrently"
        );

        let handles: Vec<_> = self
            .plugins
            .iter()
            .map(|plugin| {
                let plugin = Arc::clone(plugin);
                let data = Arc::clone(&data);
                let target_class = target_class.to_string();
                let name = plugin.name().to_string();
                let handle = tokio::task::spawn_blocking(move || {
                    run_plugin(plugin.as_ref(), &data, &target_class)
                });
                (name, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(plugin = %name, "Plugin task failed: {err}");
                    ValidationResult::fatal(&name, format!("Plugin aborted: {err}"))
                }
            };
            results.push(result);
        }

        Ok(self.report(&data, target_class, results))
    }

    /// Validate using the mode selected in the configuration
    pub async fn run(&self, data: Arc<Value>, target_class: &str) -> Result<ValidationReport> {
        if self.config.concurrent {
            self.validate_concurrent(data, target_class).await
        } else {
            self.validate(&data, target_class)
        }
    }
}

/// Run one plugin, turning an error or a panic into a fatal result
fn run_plugin(plugin: &dyn ValidationPlugin, data: &Value, target_class: &str) -> ValidationResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| plugin.validate(data, target_class)));

    match outcome {
        Ok(Ok(result)) => {
            debug!(
                plugin = plugin.name(),
                valid = result.valid,
                messages = result.validation_messages.len(),
                "Plugin finished"
            );
            result
        }
        Ok(Err(err)) => {
            warn!(plugin = plugin.name(), "Plugin failed: {err}");
            ValidationResult::fatal(plugin.name(), err)
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            warn!(plugin = plugin.name(), "Plugin panicked: {reason}");
            ValidationResult::fatal(plugin.name(), format!("Plugin aborted: {reason}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}
