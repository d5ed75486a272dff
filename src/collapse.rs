//! # Union Collapser
//!
//! Rewrites a union of alternative schemas into canonical form: same-kind
//! members merge recursively, primitives dedupe by structural equality, and
//! a one-member result degrades to a bare schema rather than a singleton
//! union.

use crate::schema::Schema;

/// Collapses `Schema::Union { of }` into canonical form.
///
/// Also accepts a non-union schema, returning it unchanged — callers in
/// [`crate::parser`] always route union-producing rules through this
/// function rather than constructing `Schema::Union` directly, so passing a
/// pre-collapsed leaf through harmlessly keeps call sites uniform.
pub fn collapse(schema: Schema) -> Schema {
    let members = match schema {
        Schema::Union { of } => of,
        other => return other,
    };

    let flat = flatten(members);

    let mut object_props: Option<std::collections::BTreeMap<String, Schema>> = None;
    let mut array_inners: Vec<Schema> = Vec::new();
    let mut prims: Vec<Schema> = Vec::new();

    for member in flat {
        match member {
            Schema::Object { props } => {
                object_props = Some(match object_props.take() {
                    None => props,
                    Some(existing) => merge_object_props(existing, props),
                });
            }
            Schema::Array { of } => array_inners.push(*of),
            other => {
                if !prims.iter().any(|p| *p == other) {
                    prims.push(other);
                }
            }
        }
    }

    let mut result = Vec::new();
    if let Some(props) = object_props {
        result.push(Schema::Object { props });
    }
    if !array_inners.is_empty() {
        let inner = collapse(Schema::Union { of: array_inners });
        result.push(Schema::Array {
            of: Box::new(inner),
        });
    }
    result.extend(prims);

    if result.len() == 1 {
        result.into_iter().next().unwrap()
    } else {
        Schema::Union { of: result }
    }
}

/// Recursively splices nested `Union` members into a single flat list.
fn flatten(members: Vec<Schema>) -> Vec<Schema> {
    let mut out = Vec::with_capacity(members.len());
    for member in members {
        match member {
            Schema::Union { of } => out.extend(flatten(of)),
            other => out.push(other),
        }
    }
    out
}

/// Key-wise union of two object property maps. A key present on both sides
/// merges via `collapse(Union{of: [a, b]})`; a key present on only one side
/// passes through unchanged.
fn merge_object_props(
    mut left: std::collections::BTreeMap<String, Schema>,
    right: std::collections::BTreeMap<String, Schema>,
) -> std::collections::BTreeMap<String, Schema> {
    for (key, right_schema) in right {
        match left.remove(&key) {
            Some(left_schema) => {
                let merged = collapse(Schema::Union {
                    of: vec![left_schema, right_schema],
                });
                left.insert(key, merged);
            }
            None => {
                left.insert(key, right_schema);
            }
        }
    }
    left
}
