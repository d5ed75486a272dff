//! # Normalized Schema Data Model
//!
//! The tagged algebra every other module in this crate produces and
//! consumes.

use std::collections::BTreeMap;

use indexmap::IndexMap;

/// A primitive JSON Schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimKind {
    /// `"null"`.
    Null,
    /// `"string"`.
    Str,
    /// `"integer"`.
    Int,
    /// `"number"`.
    Num,
    /// `"boolean"`.
    Bool,
}

impl PrimKind {
    /// Maps an OpenAPI/JSON-Schema `type` string to a [`PrimKind`].
    ///
    /// Returns `None` for `"object"` and `"array"`, which are structural
    /// types handled by [`Schema::Object`] and [`Schema::Array`] rather than
    /// this enum.
    pub fn from_type_str(s: &str) -> Option<Self> {
        match s {
            "null" => Some(PrimKind::Null),
            "string" => Some(PrimKind::Str),
            "integer" => Some(PrimKind::Int),
            "number" => Some(PrimKind::Num),
            "boolean" => Some(PrimKind::Bool),
            _ => None,
        }
    }
}

/// The normalized schema algebra.
///
/// `Schema` values are produced by construction (the parser, the collapser,
/// the merger) and are never mutated in place afterwards — every rewrite
/// returns a new value.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// A primitive leaf type.
    Prim {
        /// Which primitive kind this is.
        kind: PrimKind,
    },
    /// A homogeneous sequence.
    Array {
        /// The element schema.
        of: Box<Schema>,
    },
    /// A record with named properties.
    ///
    /// Keys are unique and iterate in lexicographic order (invariant 4);
    /// use [`BTreeMap`] rather than a hash map so that guarantee is
    /// structural, not incidental.
    Object {
        /// Property name -> schema, sorted by key.
        props: BTreeMap<String, Schema>,
    },
    /// A canonical union of incompatible alternatives.
    ///
    /// Guaranteed canonical: no nested `Union`, at most one `Object`
    /// member, at most one `Array` member, no duplicate `Prim` kinds.
    /// Construct unions only via [`crate::collapse::collapse`].
    Union {
        /// Ordered, canonical member list.
        of: Vec<Schema>,
    },
    /// A symbolic reference to a named top-level model.
    Ref {
        /// The model name (final path segment of `pointer`).
        name: String,
        /// The full JSON Pointer, e.g. `#/definitions/Pet`.
        pointer: String,
    },
    /// The top type: unknown or absent schema content.
    Any,
}

impl Schema {
    /// Shorthand for a primitive schema of the given kind.
    pub fn prim(kind: PrimKind) -> Self {
        Schema::Prim { kind }
    }

    /// `true` if this is [`Schema::Any`].
    pub fn is_any(&self) -> bool {
        matches!(self, Schema::Any)
    }

    /// `true` if this is a [`Schema::Union`].
    pub fn is_union(&self) -> bool {
        matches!(self, Schema::Union { .. })
    }
}

/// A named top-level definition (an entry of `definitions` /
/// `components/schemas`).
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// The model's name, e.g. `"Pet"`.
    pub name: String,
    /// `title` from the source schema, if present.
    pub title: Option<String>,
    /// `description` from the source schema, if present.
    pub description: Option<String>,
    /// The normalized schema body.
    pub schema: Schema,
}

/// A named, described parameter (path, query, or body).
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// `description` from the source parameter object, if present.
    pub description: Option<String>,
    /// The parameter's normalized schema.
    pub schema: Schema,
}

/// A response status code: either a literal HTTP status or the `"default"`
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusCode {
    /// A literal numeric status code.
    Code(u16),
    /// The `default` response, distinct from any integer code.
    Default,
}

/// One entry of an operation's `responses` map.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The response's status code or `Default`.
    pub code: StatusCode,
    /// The response body schema, if the response declares one.
    pub schema: Option<Schema>,
}

/// A single operation extracted from `paths`.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// `operationId` — operations without one are never constructed.
    pub id: String,
    /// `summary`, if present.
    pub summary: Option<String>,
    /// `description`, if present.
    pub description: Option<String>,
    /// `externalDocs.url`, if present.
    pub external_docs: Option<String>,
    /// The HTTP method, uppercased (`"GET"`, `"POST"`, ...).
    pub method: String,
    /// The path template, verbatim (e.g. `"/pets/{id}"`).
    pub path: String,
    /// Parameters with `in: path`.
    pub path_params: Vec<Param>,
    /// Parameters with `in: query`.
    pub query_params: Vec<Param>,
    /// Parameters with `in: body` (2.x) — 3.x carries the body in
    /// `request_body` instead.
    pub body_params: Vec<Param>,
    /// `requestBody` (3.x), normalized.
    pub request_body: Option<Schema>,
    /// The operation's declared responses.
    pub responses: Vec<Response>,
}

/// Document-level `info` metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    /// `info.title`.
    pub title: String,
    /// `info.description`, if present.
    pub description: Option<String>,
    /// `info.version`.
    pub version: String,
}

/// The fully normalized specification produced by one generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Spec {
    /// Document metadata.
    pub info: Info,
    /// `host` (2.x), defaults to empty string.
    pub host: String,
    /// `basePath` (2.x), defaults to empty string.
    pub base_path: String,
    /// `schemes`, defaults to empty.
    pub schemes: Vec<String>,
    /// `consumes`, defaults to empty.
    pub consumes: Vec<String>,
    /// Top-level models, in input enumeration order (pre-filter) or
    /// reachability order (post-filter).
    pub models: IndexMap<String, Model>,
    /// Operations, in `paths` enumeration order.
    pub operations: Vec<Operation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prim_kind_from_type_str() {
        assert_eq!(PrimKind::from_type_str("string"), Some(PrimKind::Str));
        assert_eq!(PrimKind::from_type_str("integer"), Some(PrimKind::Int));
        assert_eq!(PrimKind::from_type_str("object"), None);
        assert_eq!(PrimKind::from_type_str("array"), None);
        assert_eq!(PrimKind::from_type_str("bogus"), None);
    }

    #[test]
    fn test_schema_is_any() {
        assert!(Schema::Any.is_any());
        assert!(!Schema::prim(PrimKind::Str).is_any());
    }

    #[test]
    fn test_object_props_sorted_by_btreemap() {
        let mut props = BTreeMap::new();
        props.insert("b".to_string(), Schema::Any);
        props.insert("a".to_string(), Schema::Any);
        let keys: Vec<_> = props.keys().cloned().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
