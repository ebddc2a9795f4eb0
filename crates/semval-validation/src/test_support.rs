//! Schemas shared by the unit tests

use semval_schema::{ClassDefinition, Schema, SchemaView, SlotDefinition};
use serde_json::{Value, json};

pub(crate) fn submission_schema() -> Schema {
    Schema::new("submission")
        .with_default_range("string")
        .with_class(
            ClassDefinition::new("Submission")
                .tree_root(true)
                .with_slots(["samples", "donors", "primary_sample_ref", "title", "donor"]),
        )
        .with_class(ClassDefinition::new("Sample").with_slots(["sample_id", "donor", "donor_ref"]))
        .with_class(
            ClassDefinition::new("Donor")
                .in_subset("exclude_from_ref")
                .with_slots(["donor_id"]),
        )
        .with_slot(
            SlotDefinition::new("samples")
                .range("Sample")
                .multivalued(true)
                .inlined_as_list(true),
        )
        .with_slot(
            SlotDefinition::new("donors")
                .range("Donor")
                .multivalued(true)
                .inlined_as_list(true),
        )
        .with_slot(SlotDefinition::new("primary_sample_ref").range("Sample"))
        .with_slot(SlotDefinition::new("title"))
        .with_slot(SlotDefinition::new("sample_id").identifier(true))
        .with_slot(SlotDefinition::new("donor").range("Donor").inlined(true))
        .with_slot(SlotDefinition::new("donor_ref").range("Donor"))
        .with_slot(SlotDefinition::new("donor_id").identifier(true))
}

pub(crate) fn submission_view() -> SchemaView {
    SchemaView::new(submission_schema()).unwrap()
}

/// A single class that embeds itself through `child`
pub(crate) fn recursive_view() -> SchemaView {
    let schema = Schema::new("recursive")
        .with_class(ClassDefinition::new("Node").with_slots(["name", "child"]))
        .with_slot(SlotDefinition::new("name").range("string"))
        .with_slot(SlotDefinition::new("child").range("Node").inlined(true));
    SchemaView::new(schema).unwrap()
}

/// The canonical valid document
pub(crate) fn valid_submission() -> Value {
    json!({
        "samples": [
            {"sample_id": "S1", "donor_ref": "D1"},
            {"sample_id": "S2", "donor_ref": "D2"}
        ],
        "donors": [
            {"donor_id": "D1"},
            {"donor_id": "D2"}
        ],
        "primary_sample_ref": "S1",
        "title": "Study"
    })
}
