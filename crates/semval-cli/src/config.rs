//! Configuration file and command-line overrides

use anyhow::Context;
use semval_validation::{DEFAULT_PLUGINS, PluginSpec, ValidatorConfig};
use serde::Deserialize;
use std::path::Path;

/// Contents of a `--config` YAML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub plugins: Vec<PluginSpec>,
    pub max_depth: Option<usize>,
    pub include_object: Option<bool>,
    pub concurrent: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

/// Settings given on the `validate` command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub plugins: Vec<String>,
    pub json_schema: Option<String>,
    pub max_depth: Option<usize>,
    pub include_object: bool,
    pub concurrent: bool,
}

/// Merge file settings with command-line overrides.
///
/// `--plugin` replaces the file's plugin list; with neither, the default
/// plugins run. `--json-schema` appends a structural check.
pub fn resolve(file: FileConfig, overrides: Overrides) -> (Vec<PluginSpec>, ValidatorConfig) {
    let mut specs = if !overrides.plugins.is_empty() {
        overrides.plugins.iter().map(|name| PluginSpec::new(name.as_str())).collect()
    } else if !file.plugins.is_empty() {
        file.plugins
    } else {
        DEFAULT_PLUGINS.iter().copied().map(PluginSpec::from).collect()
    };

    if let Some(schema) = overrides.json_schema {
        specs.push(
            PluginSpec::new(crate::structural::JsonSchemaValidationPlugin::NAME)
                .with_arg("schema", schema.into()),
        );
    }

    let defaults = ValidatorConfig::default();
    let config = ValidatorConfig {
        max_depth: overrides
            .max_depth
            .or(file.max_depth)
            .unwrap_or(defaults.max_depth),
        include_object: overrides.include_object || file.include_object.unwrap_or(false),
        concurrent: overrides.concurrent || file.concurrent.unwrap_or(false),
    };

    (specs, config)
}
