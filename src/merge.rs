//! # AllOf Merger
//!
//! Merges the members of an `allOf` composition into a single `Object`
//! schema by right-wins property union. Used exclusively by the parser's
//! allOf rule.

use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use crate::schema::Schema;

/// Merges `members` (already-parsed schemas) into a single `Object`.
///
/// `Any` members are dropped first. If exactly one member remains it is
/// returned as-is. Otherwise every remaining member must be an `Object` or
/// a `Ref` resolving (via `document`) to one; their property maps fold
/// right-wins (later members in `members` order win on key collision).
/// A non-object member surviving the `Any` filter is a fatal
/// [`CoreError::MergeConflict`].
pub fn merge(members: Vec<Schema>, document: &Document, at: &str) -> CoreResult<Schema> {
    let mut remaining: Vec<Schema> = members.into_iter().filter(|s| !s.is_any()).collect();

    if remaining.len() == 1 {
        return Ok(remaining.remove(0));
    }

    let mut props = std::collections::BTreeMap::new();
    for member in remaining {
        let member_props = extract_object_props(member, document, at)?;
        for (key, schema) in member_props {
            props.insert(key, schema);
        }
    }
    Ok(Schema::Object { props })
}

fn extract_object_props(
    member: Schema,
    document: &Document,
    at: &str,
) -> CoreResult<std::collections::BTreeMap<String, Schema>> {
    match member {
        Schema::Object { props } => Ok(props),
        Schema::Ref { pointer, .. } => {
            let node = document.lookup_from(&pointer, at)?;
            let parsed = crate::parser::parse(node, document)?;
            extract_object_props(parsed, document, at)
        }
        other => Err(CoreError::merge_conflict(
            at.to_string(),
            format!("member is not an object or ref to one: {}", kind_name(&other)),
        )),
    }
}

fn kind_name(schema: &Schema) -> &'static str {
    match schema {
        Schema::Prim { .. } => "a primitive",
        Schema::Array { .. } => "an array",
        Schema::Object { .. } => "an object",
        Schema::Union { .. } => "a union",
        Schema::Ref { .. } => "a ref",
        Schema::Any => "any",
    }
}
