//! Schema-driven traversal of a document
//!
//! [`ObjectWalker`] yields every record reachable from the root through
//! inline fields, depth-first in document order. Reference (non-inline)
//! fields are never expanded. The walk keeps an explicit stack and stops with
//! [`Error::DepthExceeded`] once nesting passes the configured limit, so a
//! pathological document cannot exhaust the process stack.

use crate::path::DataPath;
use crate::value::FieldValue;
use crate::{Error, Result};
use semval_schema::SchemaProvider;
use serde_json::{Map, Value};
use tracing::trace;

/// Default maximum number of inline hops below the root
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Resolved metadata for one field of one class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef<'a> {
    /// Range of the field when it is a class known to the schema
    pub target_class: Option<&'a str>,
    pub inline: bool,
}

/// Resolve a field as seen from `class_name`.
/// Returns `None` when the schema does not know the field at all.
pub fn resolve_slot<'a>(
    schema: &'a dyn SchemaProvider,
    class_name: &str,
    field_name: &str,
) -> Option<SlotRef<'a>> {
    let slot = schema.field_definition(class_name, field_name)?;
    Some(SlotRef {
        target_class: schema.range_class(slot),
        inline: schema.is_inline(slot),
    })
}

/// A record visited by the walker
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub class_name: &'a str,
    /// Value of the class's identifier field, if the class has one and it is set
    pub identifier: Option<&'a Value>,
    pub data: &'a Map<String, Value>,
    pub path: DataPath,
}

/// A non-inline field holding identifiers of records of `target_class`
#[derive(Debug, Clone, Copy)]
pub struct ReferenceField<'a> {
    pub name: &'a str,
    pub value: &'a Value,
    pub target_class: &'a str,
}

impl<'a> Record<'a> {
    /// Fields of this record that reference other records by identifier
    pub fn reference_fields(&self, schema: &'a dyn SchemaProvider) -> Vec<ReferenceField<'a>> {
        let data: &'a Map<String, Value> = self.data;
        data.iter()
            .filter_map(|(name, value)| {
                let slot = resolve_slot(schema, self.class_name, name)?;
                let target_class = slot.target_class?;
                (!slot.inline).then_some(ReferenceField {
                    name: name.as_str(),
                    value,
                    target_class,
                })
            })
            .collect()
    }
}

struct Frame<'a> {
    class_name: &'a str,
    data: &'a Map<String, Value>,
    path: DataPath,
    depth: usize,
}

/// Lazy depth-first iterator over the records of a document
pub struct ObjectWalker<'a> {
    schema: &'a dyn SchemaProvider,
    stack: Vec<Frame<'a>>,
    max_depth: usize,
}

impl<'a> ObjectWalker<'a> {
    /// Start a walk at `data`, typed as `root_class`.
    /// A root that is not a mapping yields no records.
    pub fn new(schema: &'a dyn SchemaProvider, data: &'a Value, root_class: &'a str) -> Self {
        let stack = data
            .as_object()
            .map(|map| Frame {
                class_name: root_class,
                data: map,
                path: DataPath::root(),
                depth: 0,
            })
            .into_iter()
            .collect();

        Self {
            schema,
            stack,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how many inline hops below the root the walk may take
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Push the inline children of a record, last child first, so they
    /// pop in document order.
    fn push_children(&mut self, frame: &Frame<'a>) {
        let mut children = Vec::new();

        for (field, value) in frame.data {
            let Some(slot) = resolve_slot(self.schema, frame.class_name, field) else {
                continue;
            };
            let Some(target_class) = slot.target_class else {
                continue;
            };
            if !slot.inline {
                continue;
            }

            let field_path = frame.path.field(field);
            match FieldValue::of(value) {
                FieldValue::Absent => {}
                FieldValue::One(child) => {
                    if let Some(map) = child.as_object() {
                        children.push(Frame {
                            class_name: target_class,
                            data: map,
                            path: field_path,
                            depth: frame.depth + 1,
                        });
                    }
                }
                FieldValue::Many(items) => {
                    for (idx, item) in items.iter().enumerate() {
                        // Non-mapping elements are a structural problem, not ours
                        if let Some(map) = item.as_object() {
                            children.push(Frame {
                                class_name: target_class,
                                data: map,
                                path: field_path.index(idx),
                                depth: frame.depth + 1,
                            });
                        }
                    }
                }
            }
        }

        self.stack.extend(children.into_iter().rev());
    }
}

impl<'a> Iterator for ObjectWalker<'a> {
    type Item = Result<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.stack.pop()?;

        if frame.depth > self.max_depth {
            self.stack.clear();
            return Some(Err(Error::DepthExceeded {
                path: frame.path.to_string(),
                limit: self.max_depth,
            }));
        }

        self.push_children(&frame);

        let identifier = self
            .schema
            .identifier_field(frame.class_name)
            .and_then(|field| frame.data.get(field))
            .filter(|value| !value.is_null());

        trace!(class = frame.class_name, path = %frame.path, "visit record");

        Some(Ok(Record {
            class_name: frame.class_name,
            identifier,
            data: frame.data,
            path: frame.path,
        }))
    }
}

/// Walk a document from its root record
pub fn walk<'a>(
    schema: &'a dyn SchemaProvider,
    data: &'a Value,
    root_class: &'a str,
    max_depth: usize,
) -> ObjectWalker<'a> {
    ObjectWalker::new(schema, data, root_class).with_max_depth(max_depth)
}
