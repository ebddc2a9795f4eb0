//! Integration tests for semval-schema
//!
//! Load schema files from disk and check the resolved view.

use semval_schema::{SchemaLoader, SchemaProvider};
use std::path::{Path, PathBuf};

fn data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn submission_schema_resolves_inlining_and_identifiers() -> anyhow::Result<()> {
    let loader = SchemaLoader::default();
    let view = loader.load_view(&data_path("submission.yaml"))?;

    let samples = view
        .field_definition("Submission", "samples")
        .expect("samples slot");
    assert_eq!(view.range_class(samples), Some("Sample"));
    assert!(view.is_inline(samples));

    let reference = view
        .field_definition("Submission", "primary_sample_ref")
        .expect("reference slot");
    assert_eq!(view.range_class(reference), Some("Sample"));
    assert!(!view.is_inline(reference));

    let title = view
        .field_definition("Submission", "title")
        .expect("title slot");
    assert_eq!(view.range_class(title), None);

    assert_eq!(view.identifier_field("Sample"), Some("sample_id"));
    assert_eq!(view.identifier_field("Donor"), Some("donor_id"));
    assert_eq!(view.identifier_field("Submission"), None);
    Ok(())
}

#[test]
fn inherited_attributes_and_slot_usage_are_visible() -> anyhow::Result<()> {
    let loader = SchemaLoader::default();
    let view = loader.load_view(&data_path("submission.yaml"))?;

    assert_eq!(view.slot_names("Sample"), vec!["alias", "sample_id", "donor_ref"]);

    let donor_id = view
        .field_definition("Donor", "donor_id")
        .expect("donor_id slot");
    assert_eq!(donor_id.required, Some(true));
    assert!(donor_id.is_identifier());

    // The global definition is untouched by Donor's slot_usage
    let global = view.schema().find_slot("donor_id").expect("global slot");
    assert_eq!(global.required, None);

    assert!(view.in_subset("Donor", "exclude_from_ref"));
    assert_eq!(view.tree_root(), Some("Submission"));
    Ok(())
}

#[test]
fn loader_finds_schema_by_name_in_search_path() -> anyhow::Result<()> {
    let loader = SchemaLoader::new(vec![data_path("")]);
    let schema = loader.load("submission")?;
    assert_eq!(schema.name, "submission");
    assert_eq!(schema.id.as_deref(), Some("https://example.org/submission"));
    assert_eq!(schema.default_range.as_deref(), Some("string"));
    Ok(())
}
