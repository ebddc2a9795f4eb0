//! Schema loader for YAML and JSON schema files

use crate::model::{ClassDefinition, Schema, SlotDefinition};
use crate::registry::ConcurrentSchemaRegistry;
use crate::view::SchemaView;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Serializable schema format for loading from files
#[derive(Debug, Deserialize)]
struct SchemaFile {
    name: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    default_range: Option<String>,
    #[serde(default)]
    classes: BTreeMap<String, Option<ClassFile>>,
    #[serde(default)]
    slots: BTreeMap<String, Option<SlotFile>>,
}

#[derive(Debug, Default, Deserialize)]
struct ClassFile {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_a: Option<String>,
    #[serde(default)]
    mixins: Vec<String>,
    #[serde(default)]
    slots: Vec<String>,
    #[serde(default)]
    attributes: BTreeMap<String, Option<SlotFile>>,
    #[serde(default)]
    slot_usage: BTreeMap<String, Option<SlotFile>>,
    #[serde(default)]
    tree_root: bool,
    #[serde(default)]
    in_subset: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SlotFile {
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    identifier: Option<bool>,
    #[serde(default)]
    inlined: Option<bool>,
    #[serde(default)]
    inlined_as_list: Option<bool>,
    #[serde(default)]
    multivalued: Option<bool>,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    description: Option<String>,
}

impl SlotFile {
    fn into_definition(self, name: String) -> SlotDefinition {
        SlotDefinition {
            name,
            range: self.range,
            identifier: self.identifier,
            inlined: self.inlined,
            inlined_as_list: self.inlined_as_list,
            multivalued: self.multivalued,
            required: self.required,
            description: self.description,
        }
    }
}

fn convert_slots(slots: BTreeMap<String, Option<SlotFile>>) -> BTreeMap<String, SlotDefinition> {
    slots
        .into_iter()
        .map(|(name, slot)| {
            let definition = slot.unwrap_or_default().into_definition(name.clone());
            (name, definition)
        })
        .collect()
}

/// Schema loader with search paths and a shared cache
pub struct SchemaLoader {
    registry: Arc<ConcurrentSchemaRegistry>,
    schema_paths: Vec<PathBuf>,
}

impl SchemaLoader {
    /// Create a new schema loader with the given search paths
    pub fn new(schema_paths: Vec<PathBuf>) -> Self {
        Self {
            registry: Arc::new(ConcurrentSchemaRegistry::new()),
            schema_paths,
        }
    }

    /// Create a new schema loader with a pre-configured registry
    pub fn with_registry(
        registry: Arc<ConcurrentSchemaRegistry>,
        schema_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            registry,
            schema_paths,
        }
    }

    /// Load a schema by name from the search paths.
    /// First checks the cache, then looks for `<name>.yaml`, `<name>.yml`
    /// and `<name>.json` in each search path.
    pub fn load(&self, name: &str) -> Result<Arc<Schema>> {
        let key = format!("name:{name}");
        if let Some(cached) = self.registry.get(&key) {
            debug!("Cache hit for schema: {}", name);
            return Ok(cached);
        }

        trace!("Cache miss for schema: {}", name);

        let file_stem = name.to_lowercase();
        for path in &self.schema_paths {
            for extension in ["yaml", "yml", "json"] {
                let file_path = path.join(format!("{file_stem}.{extension}"));
                if file_path.exists() {
                    trace!("Found schema file: {:?}", file_path);
                    let schema = self.read_file(&file_path)?;
                    return Ok(self.registry.register(key, schema));
                }
            }
        }

        Err(Error::NotFound(format!(
            "Schema {} not found in search paths: {:?}",
            name, self.schema_paths
        )))
    }

    /// Load a schema from a specific file path, caching it by path
    pub fn load_from_file(&self, path: &Path) -> Result<Arc<Schema>> {
        let key = format!("path:{}", path.display());
        if let Some(cached) = self.registry.get(&key) {
            debug!("Cache hit for schema file: {:?}", path);
            return Ok(cached);
        }

        let schema = self.read_file(path)?;
        info!("Loaded schema '{}' from {:?}", schema.name, path);
        Ok(self.registry.register(key, schema))
    }

    /// Load a schema file and build a resolved view over it
    pub fn load_view(&self, path: &Path) -> Result<SchemaView> {
        let schema = self.load_from_file(path)?;
        SchemaView::new(Schema::clone(&schema))
    }

    /// Load a schema from JSON string
    pub fn load_from_json(&self, json: &str) -> Result<Schema> {
        let schema_file: SchemaFile = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))?;

        Ok(Self::convert_schema_file(schema_file))
    }

    /// Load a schema from YAML string
    pub fn load_from_yaml(&self, yaml: &str) -> Result<Schema> {
        let schema_file: SchemaFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))?;

        Ok(Self::convert_schema_file(schema_file))
    }

    fn read_file(&self, path: &Path) -> Result<Schema> {
        trace!("Loading schema from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            self.load_from_yaml(&content)
        } else {
            self.load_from_json(&content)
        }
    }

    /// Convert a SchemaFile to a Schema
    fn convert_schema_file(schema_file: SchemaFile) -> Schema {
        let classes = schema_file
            .classes
            .into_iter()
            .map(|(name, class)| {
                let class = class.unwrap_or_default();
                let definition = ClassDefinition {
                    name: name.clone(),
                    description: class.description,
                    is_a: class.is_a,
                    mixins: class.mixins,
                    slots: class.slots,
                    attributes: convert_slots(class.attributes),
                    slot_usage: convert_slots(class.slot_usage),
                    tree_root: class.tree_root,
                    in_subset: class.in_subset,
                };
                (name, definition)
            })
            .collect();

        Schema {
            name: schema_file.name,
            id: schema_file.id,
            default_range: schema_file.default_range,
            classes,
            slots: convert_slots(schema_file.slots),
        }
    }

    /// Add a search path for schema files
    pub fn add_path(&mut self, path: PathBuf) {
        self.schema_paths.push(path);
    }

    /// Get the registry (for testing/debugging)
    pub fn registry(&self) -> &ConcurrentSchemaRegistry {
        &self.registry
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new(vec![PathBuf::from(".")])
    }
}
