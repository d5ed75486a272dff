//! # Schema Parser
//!
//! Translates a raw JSON node into a [`Schema`] value. Dispatch is a
//! priority-ordered match over node shape; the first matching rule wins,
//! mirroring OpenAPI's own keyword precedence quirks rather than a clean
//! fold over every present keyword.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::collapse::collapse;
use crate::document::{ref_name, Document};
use crate::error::CoreResult;
use crate::merge::merge;
use crate::schema::{PrimKind, Schema};

const NAMED_REF_PREFIXES: [&str; 2] = ["#/definitions/", "#/components/schemas/"];

/// `true` if `r` points at a bare top-level named model — exactly
/// `#/definitions/N` or `#/components/schemas/N`, a single segment past the
/// prefix. A `$ref` with further path segments after the name (e.g.
/// `#/definitions/Pet/properties/owner`) is a nested pointer into that
/// model, not a reference to the model itself, and must be dereferenced
/// inline instead.
fn is_named_ref(r: &str) -> bool {
    NAMED_REF_PREFIXES.iter().any(|prefix| {
        r.strip_prefix(prefix)
            .is_some_and(|remainder| !remainder.is_empty() && !remainder.contains('/'))
    })
}

/// Parses `node` into a [`Schema`], dereferencing inline (non-named) refs
/// and recursing through `document` as needed.
pub fn parse(node: &Value, document: &Document) -> CoreResult<Schema> {
    let Value::Object(obj) = node else {
        return Ok(Schema::Any);
    };

    // Rule 1: `{ "schema": X }` parameter wrapper.
    if let Some(inner) = obj.get("schema") {
        return parse(inner, document);
    }

    // Rule 2: `{ "type": t }` single primitive string.
    if let Some(Value::String(t)) = obj.get("type") {
        if let Some(kind) = PrimKind::from_type_str(t) {
            return Ok(Schema::prim(kind));
        }
    }

    // Rule 3: `{ "type": [t1, ..] }` polymorphic type array.
    if let Some(Value::Array(types)) = obj.get("type") {
        let members = types
            .iter()
            .map(|t| parse(&Value::Object(single_type_object(t)), document))
            .collect::<CoreResult<Vec<_>>>()?;
        return Ok(collapse(Schema::Union { of: members }));
    }

    // Rule 4: `{ "items": [x1, ..] }` tuple-form items.
    if let Some(Value::Array(items)) = obj.get("items") {
        let members = items
            .iter()
            .map(|x| parse(x, document))
            .collect::<CoreResult<Vec<_>>>()?;
        return Ok(collapse(Schema::Union { of: members }));
    }

    // Rule 5: anyOf / oneOf.
    if let Some(Value::Array(variants)) = obj.get("anyOf").or_else(|| obj.get("oneOf")) {
        let members = variants
            .iter()
            .map(|v| parse(v, document))
            .collect::<CoreResult<Vec<_>>>()?;
        return Ok(collapse(Schema::Union { of: members }));
    }

    // Rule 6/7: `{ "type": "array", ... }`.
    if matches!(obj.get("type"), Some(Value::String(t)) if t == "array") {
        return match obj.get("items") {
            Some(items) => Ok(Schema::Array {
                of: Box::new(parse(items, document)?),
            }),
            None => Ok(Schema::Array {
                of: Box::new(Schema::Any),
            }),
        };
    }

    // Rule 8: object-form `items` without a `type: array` marker.
    if let Some(items) = obj.get("items") {
        return Ok(Schema::Array {
            of: Box::new(parse(items, document)?),
        });
    }

    // Rule 9: `{ "properties": P }`.
    if let Some(Value::Object(properties)) = obj.get("properties") {
        let mut props = BTreeMap::new();
        for (key, value) in properties {
            props.insert(key.clone(), parse(value, document)?);
        }
        return Ok(Schema::Object { props });
    }

    // Rule 10/11: allOf.
    if let Some(Value::Array(members)) = obj.get("allOf") {
        let pointer = synthetic_allof_path(node);
        if members.len() == 1 {
            return parse(&members[0], document);
        }
        let parsed = members
            .iter()
            .map(|m| parse(m, document))
            .collect::<CoreResult<Vec<_>>>()?;
        return merge(parsed, document, &pointer);
    }

    // Rule 12: bare `{ "type": "object" }` with no properties.
    if matches!(obj.get("type"), Some(Value::String(t)) if t == "object") {
        return Ok(Schema::Object {
            props: BTreeMap::new(),
        });
    }

    // Rule 13: $ref.
    if let Some(Value::String(r)) = obj.get("$ref") {
        if is_named_ref(r) {
            return Ok(Schema::Ref {
                name: ref_name(r),
                pointer: r.clone(),
            });
        }
        let target = document.lookup_from(r, r)?;
        return parse(target, document);
    }

    // Rule 14: empty body.
    if obj.is_empty() {
        return Ok(Schema::Any);
    }

    // Rule 15: content-typed body.
    if let Some(Value::Object(content)) = obj.get("content") {
        for media_type in [
            "application/json",
            "application/octet-stream",
            "application/x-www-form-urlencoded",
        ] {
            if let Some(media) = content.get(media_type) {
                return parse(media, document);
            }
        }
    }

    // Rule 16: fallback.
    Ok(Schema::Any)
}

fn single_type_object(t: &Value) -> serde_json::Map<String, Value> {
    let mut m = serde_json::Map::new();
    m.insert("type".to_string(), t.clone());
    m
}

/// Builds a synthetic path for error reporting when an `allOf` node has no
/// real document pointer available (it's being parsed inline, not fetched
/// via a `$ref`).
fn synthetic_allof_path(node: &Value) -> String {
    match node.get("title") {
        Some(Value::String(t)) => format!("<allOf:{t}>"),
        _ => "<allOf>".to_string(),
    }
}
