//! # Operation Extractor
//!
//! Walks the document's `paths` object into a flat list of [`Operation`]
//! records, dereferencing parameter refs and partitioning parameters by
//! their `in` field.

use serde_json::Value;

use crate::document::Document;
use crate::error::CoreResult;
use crate::parser::parse;
use crate::schema::{Operation, Param, Response, StatusCode};

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Extracts every operation from `paths`, in path/method enumeration order.
///
/// Operations lacking `operationId` are silently skipped.
pub fn extract_operations(document: &Document) -> CoreResult<Vec<Operation>> {
    let mut operations = Vec::new();

    let Some(Value::Object(paths)) = document.root().get("paths") else {
        return Ok(operations);
    };

    for (path, path_item) in paths {
        let Value::Object(path_item_obj) = path_item else {
            continue;
        };
        let default_params = path_item_obj
            .get("parameters")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        for method in HTTP_METHODS {
            let Some(op_node) = path_item_obj.get(method) else {
                continue;
            };
            let Value::Object(op_obj) = op_node else {
                continue;
            };

            let Some(Value::String(id)) = op_obj.get("operationId") else {
                tracing::debug!(path = %path, method = %method, "dropping operation without operationId");
                continue;
            };

            let summary = string_field(op_obj, "summary");
            let description = string_field(op_obj, "description");
            let external_docs = op_obj
                .get("external_docs")
                .or_else(|| op_obj.get("externalDocs"))
                .and_then(|v| v.get("url"))
                .and_then(Value::as_str)
                .map(str::to_string);

            let op_params = op_obj
                .get("parameters")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let effective_params = overlay_parameters(&default_params, &op_params);

            let mut path_params = Vec::new();
            let mut query_params = Vec::new();
            let mut body_params = Vec::new();

            for param_node in &effective_params {
                let resolved = dereference_parameter(param_node, document)?;
                let Value::Object(param_obj) = &resolved else {
                    continue;
                };
                let Some(Value::String(name)) = param_obj.get("name") else {
                    continue;
                };
                let location = param_obj.get("in").and_then(Value::as_str).unwrap_or("");
                let param = Param {
                    name: name.clone(),
                    description: string_field(param_obj, "description"),
                    schema: parse(&resolved, document)?,
                };
                match location {
                    "path" => path_params.push(param),
                    "query" => query_params.push(param),
                    "body" => body_params.push(param),
                    _ => {}
                }
            }

            let request_body = match op_obj.get("requestBody") {
                Some(rb) => Some(parse(rb, document)?),
                None => None,
            };

            let responses = match op_obj.get("responses") {
                Some(Value::Object(resp_map)) => extract_responses(resp_map, document)?,
                _ => Vec::new(),
            };

            operations.push(Operation {
                id: id.clone(),
                summary,
                description,
                external_docs,
                method: method.to_ascii_uppercase(),
                path: path.clone(),
                path_params,
                query_params,
                body_params,
                request_body,
                responses,
            });
        }
    }

    Ok(operations)
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Overlays operation-level parameters on top of path-item defaults,
/// keyed by `(name, in)`; an operation-level entry with the same key
/// replaces the default rather than duplicating it.
fn overlay_parameters(defaults: &[Value], overrides: &[Value]) -> Vec<Value> {
    let override_keys: Vec<(String, String)> =
        overrides.iter().filter_map(param_key).collect();

    let mut result: Vec<Value> = defaults
        .iter()
        .filter(|d| {
            param_key(d)
                .map(|k| !override_keys.contains(&k))
                .unwrap_or(true)
        })
        .cloned()
        .collect();
    result.extend(overrides.iter().cloned());
    result
}

fn param_key(node: &Value) -> Option<(String, String)> {
    let obj = node.as_object()?;
    let name = obj.get("name")?.as_str()?.to_string();
    let location = obj.get("in")?.as_str()?.to_string();
    Some((name, location))
}

fn dereference_parameter(node: &Value, document: &Document) -> CoreResult<Value> {
    if let Some(Value::String(r)) = node.as_object().and_then(|o| o.get("$ref")) {
        return document.lookup_from(r, r).map(Value::clone);
    }
    Ok(node.clone())
}

fn extract_responses(
    resp_map: &serde_json::Map<String, Value>,
    document: &Document,
) -> CoreResult<Vec<Response>> {
    let mut responses = Vec::new();
    for (code, resp_node) in resp_map {
        let status = if code == "default" {
            StatusCode::Default
        } else {
            match code.parse::<u16>() {
                Ok(n) => StatusCode::Code(n),
                Err(_) => continue,
            }
        };
        let has_schema = resp_node.get("schema").is_some() || resp_node.get("content").is_some();
        let schema = if has_schema {
            Some(parse(resp_node, document)?)
        } else {
            None
        };
        responses.push(Response {
            code: status,
            schema,
        });
    }
    Ok(responses)
}
