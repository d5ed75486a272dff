//! # Document Store
//!
//! Wraps a parsed OpenAPI document and resolves JSON Pointers (RFC 6901)
//! against it. Every other component reaches the raw tree only through
//! [`Document::lookup`] — none of them hold a `&serde_json::Value` of their
//! own for longer than a single call.

use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// An immutable, parsed OpenAPI document.
///
/// Cheap to pass by reference: normalization never mutates the source tree,
/// only builds new [`crate::schema::Schema`] values alongside it.
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Wraps an already-parsed JSON value as a document root.
    pub fn new(root: Value) -> Self {
        Document { root }
    }

    /// The document root.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Resolves a JSON Pointer against the document.
    ///
    /// Accepts both a bare pointer (`/definitions/Pet`) and a fragment
    /// reference (`#/definitions/Pet`); a leading `#` is stripped before
    /// the pointer is split on `/`. Each segment first has `~1` and `~0`
    /// unescaped, then is percent-decoded, in that order — a literal `~1`
    /// or `~0` substring is resolved before any `%`-escape is, so a segment
    /// like `%7E1` (a percent-escaped tilde followed by `1`) decodes to the
    /// two-character key `~1` rather than being mistaken for an escaped `/`.
    ///
    /// Numeric segments are tried as array indices first; if the current
    /// node is a [`Value::Object`] instead, the raw segment string is used
    /// as a map key, since object property names that happen to look like
    /// numbers are legal JSON Schema keys.
    pub fn lookup(&self, pointer: &str) -> CoreResult<&Value> {
        let stripped = pointer.strip_prefix('#').unwrap_or(pointer);
        if stripped.is_empty() || stripped == "/" {
            return Ok(&self.root);
        }
        let Some(rest) = stripped.strip_prefix('/') else {
            return Err(CoreError::ref_not_found(pointer));
        };

        let mut node = &self.root;
        for raw_segment in rest.split('/') {
            let segment = decode_percent(&unescape_segment(raw_segment));
            node = step(node, &segment).ok_or_else(|| CoreError::ref_not_found(pointer))?;
        }
        Ok(node)
    }

    /// Like [`Document::lookup`], but attaches `referrer` to the error on
    /// failure so callers can report which schema held the dangling ref.
    pub fn lookup_from(&self, pointer: &str, referrer: &str) -> CoreResult<&Value> {
        self.lookup(pointer)
            .map_err(|_| CoreError::ref_not_found_from(pointer, referrer))
    }
}

fn decode_percent(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Extracts the final path segment of a pointer as a model name, e.g.
/// `"#/definitions/Pet"` -> `"Pet"`.
pub fn ref_name(pointer: &str) -> String {
    pointer
        .rsplit('/')
        .next()
        .map(|s| decode_percent(&unescape_segment(s)))
        .unwrap_or_else(|| pointer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        Document::new(json!({
            "definitions": {
                "Pet": {"type": "object"},
                "a/b": {"type": "string"},
                "a~b": {"type": "boolean"},
                "0": {"type": "null"},
                "~1": {"type": "integer"}
            },
            "paths": {
                "/pets": {
                    "get": {"operationId": "listPets"}
                }
            },
            "list": ["first", "second", "third"]
        }))
    }

    #[test]
    fn test_lookup_root() {
        let d = doc();
        assert_eq!(d.lookup("").unwrap(), d.root());
        assert_eq!(d.lookup("#").unwrap(), d.root());
    }

    #[test]
    fn test_lookup_simple_object_segment() {
        let d = doc();
        let found = d.lookup("#/definitions/Pet").unwrap();
        assert_eq!(found, &json!({"type": "object"}));
    }

    #[test]
    fn test_lookup_without_hash_prefix() {
        let d = doc();
        let found = d.lookup("/definitions/Pet").unwrap();
        assert_eq!(found, &json!({"type": "object"}));
    }

    #[test]
    fn test_lookup_unescapes_tilde_one_as_slash() {
        let d = doc();
        let found = d.lookup("#/definitions/a~1b").unwrap();
        assert_eq!(found, &json!({"type": "string"}));
    }

    #[test]
    fn test_lookup_unescapes_tilde_zero_as_tilde() {
        let d = doc();
        let found = d.lookup("#/definitions/a~0b").unwrap();
        assert_eq!(found, &json!({"type": "boolean"}));
    }

    /// Pins the order of the two decode steps: unescaping `~1`/`~0` runs
    /// *before* percent-decoding. A raw segment of `%7E1` has no literal
    /// `~1` substring (it's `%`, `7`, `E`, `1`), so unescaping first leaves
    /// it untouched; percent-decoding it second turns `%7E` into `~`,
    /// yielding the two-character key `~1` — not `/`, which is what
    /// decode-then-unescape would have produced by percent-decoding to
    /// `~1` first and then unescaping that into a slash.
    #[test]
    fn test_lookup_unescapes_before_percent_decoding() {
        let d = doc();
        let found = d.lookup("#/definitions/%7E1").unwrap();
        assert_eq!(found, &json!({"type": "integer"}));
    }

    #[test]
    fn test_lookup_array_index() {
        let d = doc();
        let found = d.lookup("#/list/1").unwrap();
        assert_eq!(found, &json!("second"));
    }

    #[test]
    fn test_lookup_numeric_key_against_object_falls_back_to_string() {
        let d = doc();
        let found = d.lookup("#/definitions/0").unwrap();
        assert_eq!(found, &json!({"type": "null"}));
    }

    #[test]
    fn test_lookup_nested_path_with_method_segment() {
        let d = doc();
        let found = d.lookup("#/paths/~1pets/get").unwrap();
        assert_eq!(found, &json!({"operationId": "listPets"}));
    }

    #[test]
    fn test_lookup_missing_segment_is_ref_not_found() {
        let d = doc();
        let err = d.lookup("#/definitions/Missing").unwrap_err();
        assert_eq!(
            err,
            CoreError::RefNotFound {
                pointer: "#/definitions/Missing".to_string(),
                referrer: None,
            }
        );
    }

    #[test]
    fn test_lookup_out_of_range_array_index_is_ref_not_found() {
        let d = doc();
        assert!(d.lookup("#/list/99").is_err());
    }

    #[test]
    fn test_lookup_from_attaches_referrer() {
        let d = doc();
        let err = d
            .lookup_from("#/definitions/Missing", "#/definitions/Pet")
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::RefNotFound {
                pointer: "#/definitions/Missing".to_string(),
                referrer: Some("#/definitions/Pet".to_string()),
            }
        );
    }

    #[test]
    fn test_ref_name_extracts_final_segment() {
        assert_eq!(ref_name("#/definitions/Pet"), "Pet");
        assert_eq!(ref_name("#/components/schemas/Pet"), "Pet");
    }

    #[test]
    fn test_ref_name_unescapes_final_segment() {
        assert_eq!(ref_name("#/definitions/a~1b"), "a/b");
    }
}
