// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference extraction for relationship attributes

use crate::preprocess::format_name;
use serde_json::Value;

/// Member holding a referenced path
pub const REF: &str = "ref";

/// One `(kind, target)` edge read from a relationship attribute
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipRef {
    /// Component naming the relationship
    pub kind: String,
    /// Referenced path
    pub target: String,
}

/// Read every reference out of a relationship value
///
/// Accepted shapes, with `component` the formatted attribute name:
/// - `{"ref": p}` gives `(component, p)`
/// - `[{"ref": p}, ..]` gives one `(component, p)` per element
/// - `{"field": {"ref": p}, ..}` gives `(component_field, p)` per field
///
/// Elements of any other shape are skipped.
pub fn extract_refs(component: &str, value: &Value) -> Vec<RelationshipRef> {
    let mut refs = Vec::new();

    match value {
        Value::Object(object) if object.contains_key(REF) => {
            push_ref(&mut refs, component, value);
        }
        Value::Object(object) => {
            for (field, field_value) in object {
                let kind = format!("{}_{}", component, format_name(field));
                match field_value {
                    Value::Array(items) => {
                        for item in items {
                            push_ref(&mut refs, &kind, item);
                        }
                    }
                    other => push_ref(&mut refs, &kind, other),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                push_ref(&mut refs, component, item);
            }
        }
        _ => {}
    }

    refs
}

fn push_ref(refs: &mut Vec<RelationshipRef>, kind: &str, value: &Value) {
    if let Some(target) = value.get(REF).and_then(Value::as_str) {
        refs.push(RelationshipRef {
            kind: kind.to_string(),
            target: target.to_string(),
        });
    }
}
