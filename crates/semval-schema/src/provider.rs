//! Read-only schema metadata capability consumed by validators

use crate::model::SlotDefinition;

/// Answers the schema questions a document walk needs.
///
/// Implementations own all inheritance and `slot_usage` resolution; callers
/// only ever ask class-scoped questions and never reason about ancestry.
pub trait SchemaProvider: Send + Sync {
    /// Definition of `field_name` as seen from `class_name`: class-specific
    /// overrides first, then the global slot definition.
    fn field_definition(&self, class_name: &str, field_name: &str) -> Option<&SlotDefinition>;

    /// Whether the slot embeds its target records instead of referencing them
    fn is_inline(&self, slot: &SlotDefinition) -> bool;

    /// The slot's range when it names a class known to the schema
    fn range_class(&self, slot: &SlotDefinition) -> Option<&str>;

    /// Name of the field holding the class identifier
    fn identifier_field(&self, class_name: &str) -> Option<&str>;

    /// All class names, sorted
    fn class_names(&self) -> Vec<&str>;

    /// Slot names declared for a class, including inherited ones
    fn slot_names(&self, class_name: &str) -> Vec<&str>;

    fn has_class(&self, class_name: &str) -> bool {
        self.class_names().contains(&class_name)
    }

    /// Whether a class is a member of the named subset
    fn in_subset(&self, _class_name: &str, _subset: &str) -> bool {
        false
    }
}
