//! Classification of raw field values

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::slice;

/// Cardinality of a raw field value, resolved once at the point of use
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// `null`
    Absent,
    /// Any non-list value
    One(&'a Value),
    /// A list of zero or more values
    Many(&'a [Value]),
}

impl<'a> FieldValue<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Array(items) => Self::Many(items),
            other => Self::One(other),
        }
    }

    /// The value normalized to a list
    #[must_use]
    pub fn values(self) -> &'a [Value] {
        match self {
            Self::Absent => &[],
            Self::One(value) => slice::from_ref(value),
            Self::Many(items) => items,
        }
    }
}

/// Key used to compare identifier values.
///
/// The JSON text keeps `"1"` and `1` distinct.
#[must_use]
pub fn identifier_key(value: &Value) -> String {
    value.to_string()
}

/// Human-readable rendering of a value: strings without quotes
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-class sets of identifier values observed during one walk
#[derive(Debug, Default)]
pub struct IdentifierIndex<'a> {
    by_class: HashMap<&'a str, HashSet<String>>,
}

impl<'a> IdentifierIndex<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier; returns `false` if it was already present
    pub fn insert(&mut self, class_name: &'a str, value: &Value) -> bool {
        self.by_class
            .entry(class_name)
            .or_default()
            .insert(identifier_key(value))
    }

    /// A missing class behaves as an empty set
    #[must_use]
    pub fn contains(&self, class_name: &str, value: &Value) -> bool {
        self.by_class
            .get(class_name)
            .is_some_and(|ids| ids.contains(&identifier_key(value)))
    }

    /// Number of identifiers recorded for a class
    #[must_use]
    pub fn count(&self, class_name: &str) -> usize {
        self.by_class.get(class_name).map_or(0, HashSet::len)
    }
}
