//! Resolved, read-only view over a schema
//!
//! `SchemaView` linearizes every class once when it is built and keeps the
//! induced slot table per class, so lookups during a document walk are plain
//! map reads.

use crate::inheritance::{induce_slot, linearize};
use crate::model::{ClassDefinition, Schema, SlotDefinition};
use crate::provider::SchemaProvider;
use crate::Result;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Default)]
struct InducedClass {
    /// Slot names in declaration order, ancestors first
    order: Vec<String>,
    slots: HashMap<String, SlotDefinition>,
    identifier: Option<String>,
}

/// Schema with inheritance and slot overrides resolved per class
#[derive(Debug)]
pub struct SchemaView {
    schema: Schema,
    induced: HashMap<String, InducedClass>,
}

impl SchemaView {
    /// Resolve every class of the schema.
    ///
    /// Fails when a class names an unknown parent or mixin, or when the
    /// inheritance graph contains a cycle.
    pub fn new(schema: Schema) -> Result<Self> {
        let mut induced = HashMap::with_capacity(schema.classes.len());

        for name in schema.classes.keys() {
            let ancestry = linearize(&schema, name)?;

            let mut order: Vec<String> = Vec::new();
            for class in &ancestry {
                for slot_name in class
                    .slots
                    .iter()
                    .chain(class.attributes.keys())
                    .chain(class.slot_usage.keys())
                {
                    if !order.contains(slot_name) {
                        order.push(slot_name.clone());
                    }
                }
            }

            let slots: HashMap<String, SlotDefinition> = order
                .iter()
                .filter_map(|slot_name| {
                    induce_slot(&schema, &ancestry, slot_name).map(|def| (slot_name.clone(), def))
                })
                .collect();
            order.retain(|slot_name| slots.contains_key(slot_name));

            let identifier = order
                .iter()
                .find(|slot_name| slots[slot_name.as_str()].is_identifier())
                .cloned();

            induced.insert(
                name.clone(),
                InducedClass {
                    order,
                    slots,
                    identifier,
                },
            );
        }

        debug!(
            "Resolved schema '{}' with {} classes",
            schema.name,
            induced.len()
        );

        Ok(Self { schema, induced })
    }

    /// The underlying schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Find a class definition by name
    pub fn class(&self, name: &str) -> Option<&ClassDefinition> {
        self.schema.find_class(name)
    }

    /// The declared range of a slot, falling back to the schema default
    pub fn effective_range<'a>(&'a self, slot: &'a SlotDefinition) -> Option<&'a str> {
        slot.range
            .as_deref()
            .or(self.schema.default_range.as_deref())
    }

    /// Infer the document root class.
    ///
    /// A class flagged `tree_root` wins. Otherwise the root is the only class
    /// that no slot uses as its range.
    pub fn tree_root(&self) -> Option<&str> {
        if let Some(root) = self.schema.classes.values().find(|c| c.tree_root) {
            return Some(root.name.as_str());
        }

        let referenced: HashSet<&str> = self
            .induced
            .values()
            .flat_map(|c| c.slots.values())
            .chain(self.schema.slots.values())
            .filter_map(|slot| self.range_class(slot))
            .collect();

        let mut candidates = self
            .schema
            .classes
            .keys()
            .map(String::as_str)
            .filter(|name| !referenced.contains(name));

        match (candidates.next(), candidates.next()) {
            (Some(root), None) => Some(root),
            _ => None,
        }
    }
}

impl SchemaProvider for SchemaView {
    fn field_definition(&self, class_name: &str, field_name: &str) -> Option<&SlotDefinition> {
        self.induced
            .get(class_name)
            .and_then(|c| c.slots.get(field_name))
            .or_else(|| self.schema.find_slot(field_name))
    }

    fn is_inline(&self, slot: &SlotDefinition) -> bool {
        match self.range_class(slot) {
            None => false,
            Some(range) => slot.is_declared_inline() || self.identifier_field(range).is_none(),
        }
    }

    fn range_class(&self, slot: &SlotDefinition) -> Option<&str> {
        let range = slot
            .range
            .as_deref()
            .or(self.schema.default_range.as_deref())?;
        self.schema
            .classes
            .get_key_value(range)
            .map(|(name, _)| name.as_str())
    }

    fn identifier_field(&self, class_name: &str) -> Option<&str> {
        self.induced
            .get(class_name)
            .and_then(|c| c.identifier.as_deref())
    }

    fn class_names(&self) -> Vec<&str> {
        self.schema.classes.keys().map(String::as_str).collect()
    }

    fn slot_names(&self, class_name: &str) -> Vec<&str> {
        self.induced
            .get(class_name)
            .map(|c| c.order.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn has_class(&self, class_name: &str) -> bool {
        self.schema.classes.contains_key(class_name)
    }

    fn in_subset(&self, class_name: &str, subset: &str) -> bool {
        self.schema
            .find_class(class_name)
            .is_some_and(|c| c.in_subset.iter().any(|s| s == subset))
    }
}
