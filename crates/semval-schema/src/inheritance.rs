//! Class inheritance and slot override merge logic

use crate::model::{ClassDefinition, Schema, SlotDefinition};
use crate::{Error, Result};
use std::collections::HashSet;

/// Linearize the ancestry of a class.
///
/// Returns the class definitions from the most distant ancestor to the class
/// itself: for every class its `is_a` parent comes first, then its mixins in
/// declaration order. Each class appears once.
pub fn linearize<'a>(schema: &'a Schema, class_name: &str) -> Result<Vec<&'a ClassDefinition>> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = Vec::new();
    visit(schema, class_name, None, &mut stack, &mut seen, &mut out)?;
    Ok(out)
}

fn visit<'a>(
    schema: &'a Schema,
    class_name: &str,
    referenced_by: Option<&str>,
    stack: &mut Vec<String>,
    seen: &mut HashSet<String>,
    out: &mut Vec<&'a ClassDefinition>,
) -> Result<()> {
    if stack.iter().any(|c| c == class_name) {
        let mut cycle = stack.clone();
        cycle.push(class_name.to_string());
        return Err(Error::Inheritance(format!(
            "Circular dependency detected: {}",
            cycle.join(" -> ")
        )));
    }
    if seen.contains(class_name) {
        return Ok(());
    }

    let class = schema.find_class(class_name).ok_or_else(|| match referenced_by {
        Some(child) => Error::Inheritance(format!(
            "Parent class not found: {class_name} (referenced by {child})"
        )),
        None => Error::NotFound(format!("Class not found: {class_name}")),
    })?;

    stack.push(class_name.to_string());
    for parent in class.is_a.iter().chain(class.mixins.iter()) {
        visit(schema, parent, Some(class_name), stack, seen, out)?;
    }
    stack.pop();

    seen.insert(class_name.to_string());
    out.push(class);
    Ok(())
}

/// Merge an override onto a base slot definition.
/// Properties set on the override take precedence.
pub fn merge_slot(base: &SlotDefinition, overrides: &SlotDefinition) -> SlotDefinition {
    SlotDefinition {
        name: base.name.clone(),
        range: overrides.range.clone().or_else(|| base.range.clone()),
        identifier: overrides.identifier.or(base.identifier),
        inlined: overrides.inlined.or(base.inlined),
        inlined_as_list: overrides.inlined_as_list.or(base.inlined_as_list),
        multivalued: overrides.multivalued.or(base.multivalued),
        required: overrides.required.or(base.required),
        description: overrides
            .description
            .clone()
            .or_else(|| base.description.clone()),
    }
}

/// Resolve the effective definition of `slot_name` for a linearized ancestry.
///
/// The base is the nearest class-local attribute, falling back to the global
/// slot. `slot_usage` entries are then applied from the most distant ancestor
/// to the class itself. Returns `None` when nothing declares the slot.
pub fn induce_slot(
    schema: &Schema,
    ancestry: &[&ClassDefinition],
    slot_name: &str,
) -> Option<SlotDefinition> {
    let base = ancestry
        .iter()
        .rev()
        .find_map(|c| c.attributes.get(slot_name))
        .or_else(|| schema.find_slot(slot_name))
        .cloned();

    let mut usages = ancestry.iter().filter_map(|c| c.slot_usage.get(slot_name));
    let mut resolved = match base {
        Some(base) => base,
        None => SlotDefinition {
            name: slot_name.to_string(),
            ..usages.next()?.clone()
        },
    };
    for usage in usages {
        resolved = merge_slot(&resolved, usage);
    }
    Some(resolved)
}
