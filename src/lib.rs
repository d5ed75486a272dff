//! # oas-client-core
//!
//! Normalizes an already-parsed OpenAPI document (2.x or 3.x) into a
//! [`Spec`]: schemas collapsed to canonical form, `allOf` flattened,
//! JSON-Pointer refs resolved, and the model universe pruned to exactly
//! what the selected operations reach.

pub mod collapse;
pub mod config;
pub mod document;
pub mod error;
pub mod merge;
pub mod operations;
pub mod parser;
pub mod reachability;
pub mod schema;

use indexmap::IndexMap;
use serde_json::Value;

pub use config::{AllowList, DefaultConfig, GeneratorConfig};
pub use document::Document;
pub use error::{CoreError, CoreResult};
pub use schema::{
    Info, Model, Operation, Param, PrimKind, Response, Schema, Spec, StatusCode,
};

/// Runs one full generation pass: parses `document` into a [`Spec`] and
/// prunes it to what `config` selects.
///
/// This is the crate's single entry point: the document is parsed into
/// models and operations, then the reachability filter prunes both down
/// to what `config` actually selects.
pub fn normalize(document: Value, config: &dyn GeneratorConfig) -> CoreResult<Spec> {
    let document = Document::new(document);
    tracing::info!("starting normalization pass");

    let info = parse_info(&document);
    let (host, base_path, schemes, consumes) = parse_server_fields(&document);
    let models = parse_models(&document)?;
    let operations = operations::extract_operations(&document)?;

    let spec = Spec {
        info,
        host,
        base_path,
        schemes,
        consumes,
        models,
        operations,
    };

    reachability::filter(spec, config, &document)
}

fn parse_info(document: &Document) -> Info {
    let Some(info) = document.root().get("info") else {
        return Info::default();
    };
    Info {
        title: info
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        description: info
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        version: info
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

fn parse_server_fields(document: &Document) -> (String, String, Vec<String>, Vec<String>) {
    let root = document.root();
    let host = root
        .get("host")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let base_path = root
        .get("basePath")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let schemes = string_array(root.get("schemes"));
    let consumes = string_array(root.get("consumes"));
    (host, base_path, schemes, consumes)
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parses `definitions` (2.x) or `components.schemas` (3.x) into the
/// top-level model list, preserving input enumeration order.
fn parse_models(document: &Document) -> CoreResult<IndexMap<String, Model>> {
    let root = document.root();
    let definitions = root
        .get("definitions")
        .and_then(Value::as_object)
        .or_else(|| {
            root.get("components")
                .and_then(|c| c.get("schemas"))
                .and_then(Value::as_object)
        });

    let mut models = IndexMap::new();
    let Some(definitions) = definitions else {
        return Ok(models);
    };

    for (name, node) in definitions {
        let title = node.get("title").and_then(Value::as_str).map(str::to_string);
        let description = node
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);
        let schema = parser::parse(node, document)?;
        models.insert(
            name.clone(),
            Model {
                name: name.clone(),
                title,
                description,
                schema,
            },
        );
    }
    Ok(models)
}
