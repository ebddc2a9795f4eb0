//! Schema model definitions

use std::collections::BTreeMap;

/// A complete schema: the class table plus the global slot table
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub name: String,
    pub id: Option<String>,
    /// Range used by slots that do not declare one
    pub default_range: Option<String>,
    pub classes: BTreeMap<String, ClassDefinition>,
    pub slots: BTreeMap<String, SlotDefinition>,
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the default range
    #[must_use]
    pub fn with_default_range(mut self, range: impl Into<String>) -> Self {
        self.default_range = Some(range.into());
        self
    }

    /// Add a class definition
    #[must_use]
    pub fn with_class(mut self, class: ClassDefinition) -> Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    /// Add a global slot definition
    #[must_use]
    pub fn with_slot(mut self, slot: SlotDefinition) -> Self {
        self.slots.insert(slot.name.clone(), slot);
        self
    }

    /// Find a class by name
    pub fn find_class(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.get(name)
    }

    /// Find a global slot by name
    pub fn find_slot(&self, name: &str) -> Option<&SlotDefinition> {
        self.slots.get(name)
    }
}

/// Definition of a class (record type)
#[derive(Debug, Clone, Default)]
pub struct ClassDefinition {
    pub name: String,
    pub description: Option<String>,
    /// Single-inheritance parent
    pub is_a: Option<String>,
    pub mixins: Vec<String>,
    /// Names of global slots used by this class
    pub slots: Vec<String>,
    /// Class-local slot definitions
    pub attributes: BTreeMap<String, SlotDefinition>,
    /// Per-class overrides of slot properties
    pub slot_usage: BTreeMap<String, SlotDefinition>,
    pub tree_root: bool,
    pub in_subset: Vec<String>,
}

impl ClassDefinition {
    /// Create a new class definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the parent class
    #[must_use]
    pub fn is_a(mut self, parent: impl Into<String>) -> Self {
        self.is_a = Some(parent.into());
        self
    }

    /// Add a mixin class
    #[must_use]
    pub fn mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixins.push(mixin.into());
        self
    }

    /// Use global slots
    #[must_use]
    pub fn with_slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slots.extend(slots.into_iter().map(Into::into));
        self
    }

    /// Add a class-local attribute
    #[must_use]
    pub fn with_attribute(mut self, slot: SlotDefinition) -> Self {
        self.attributes.insert(slot.name.clone(), slot);
        self
    }

    /// Override properties of a slot for this class
    #[must_use]
    pub fn with_slot_usage(mut self, slot: SlotDefinition) -> Self {
        self.slot_usage.insert(slot.name.clone(), slot);
        self
    }

    /// Mark as the document root class
    #[must_use]
    pub fn tree_root(mut self, tree_root: bool) -> Self {
        self.tree_root = tree_root;
        self
    }

    /// Add the class to a subset
    #[must_use]
    pub fn in_subset(mut self, subset: impl Into<String>) -> Self {
        self.in_subset.push(subset.into());
        self
    }
}

/// Definition of a slot (field).
///
/// Every property except the name is optional so the same type can carry
/// both a full definition and a partial `slot_usage` override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotDefinition {
    pub name: String,
    pub range: Option<String>,
    pub identifier: Option<bool>,
    pub inlined: Option<bool>,
    pub inlined_as_list: Option<bool>,
    pub multivalued: Option<bool>,
    pub required: Option<bool>,
    pub description: Option<String>,
}

impl SlotDefinition {
    /// Create a new slot definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the range
    #[must_use]
    pub fn range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Mark as the identifier of its class
    #[must_use]
    pub fn identifier(mut self, identifier: bool) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Set inlining
    #[must_use]
    pub fn inlined(mut self, inlined: bool) -> Self {
        self.inlined = Some(inlined);
        self
    }

    /// Set list inlining
    #[must_use]
    pub fn inlined_as_list(mut self, inlined_as_list: bool) -> Self {
        self.inlined_as_list = Some(inlined_as_list);
        self
    }

    /// Set multivalued
    #[must_use]
    pub fn multivalued(mut self, multivalued: bool) -> Self {
        self.multivalued = Some(multivalued);
        self
    }

    /// Set required
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn is_identifier(&self) -> bool {
        self.identifier.unwrap_or(false)
    }

    /// Whether the slot explicitly asks for its values to be embedded
    pub fn is_declared_inline(&self) -> bool {
        self.inlined.unwrap_or(false) || self.inlined_as_list.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder() {
        let schema = Schema::new("submission")
            .with_default_range("string")
            .with_class(ClassDefinition::new("Sample").with_slots(["sample_id"]))
            .with_slot(SlotDefinition::new("sample_id").identifier(true));

        assert_eq!(schema.name, "submission");
        assert_eq!(schema.default_range.as_deref(), Some("string"));
        assert!(schema.find_class("Sample").is_some());
        assert!(schema.find_slot("sample_id").unwrap().is_identifier());
        assert!(schema.find_class("Missing").is_none());
    }

    #[test]
    fn test_slot_flags_default_to_false() {
        let slot = SlotDefinition::new("name");
        assert!(!slot.is_identifier());
        assert!(!slot.is_declared_inline());

        let slot = SlotDefinition::new("samples").inlined_as_list(true);
        assert!(slot.is_declared_inline());
    }
}
