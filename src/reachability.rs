//! # Reachability Filter
//!
//! Given the operations selected by caller configuration, computes the
//! transitive closure of every model reference they touch and prunes the
//! model universe to exactly that closure.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::config::GeneratorConfig;
use crate::document::Document;
use crate::error::CoreResult;
use crate::parser::parse;
use crate::schema::{Model, Operation, Schema, Spec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefState {
    New,
    Seen,
}

/// Filters `spec` in place (conceptually — a new `Spec` is returned) to the
/// operations `config` selects and the models transitively reachable from
/// them.
pub fn filter(spec: Spec, config: &dyn GeneratorConfig, document: &Document) -> CoreResult<Spec> {
    let operations: Vec<Operation> = spec
        .operations
        .into_iter()
        .filter(|op| config.include_operation(&op.id))
        .collect();

    let mut states: HashMap<String, RefState> = HashMap::new();
    for op in &operations {
        for schema in operation_schemas(op) {
            collect_refs(schema, &mut states);
        }
    }

    loop {
        let next: Option<String> = states
            .iter()
            .find(|(_, state)| **state == RefState::New)
            .map(|(pointer, _)| pointer.clone());

        let Some(pointer) = next else { break };
        states.insert(pointer.clone(), RefState::Seen);

        let node = document.lookup_from(&pointer, &pointer)?;
        let parsed = parse(node, document)?;
        let before = states.len();
        collect_refs(&parsed, &mut states);
        let discovered = states.len().saturating_sub(before);
        tracing::trace!(pointer = %pointer, discovered, "reachability fixpoint iteration");
    }

    let closure_names: std::collections::HashSet<String> = states
        .keys()
        .map(|pointer| crate::document::ref_name(pointer))
        .collect();

    let models: IndexMap<String, Model> = spec
        .models
        .into_iter()
        .filter(|(name, _)| closure_names.contains(name))
        .collect();

    Ok(Spec {
        models,
        operations,
        ..spec
    })
}

fn operation_schemas(op: &Operation) -> Vec<&Schema> {
    let mut schemas = Vec::new();
    for p in op.path_params.iter().chain(&op.query_params).chain(&op.body_params) {
        schemas.push(&p.schema);
    }
    if let Some(rb) = &op.request_body {
        schemas.push(rb);
    }
    for r in &op.responses {
        if let Some(s) = &r.schema {
            schemas.push(s);
        }
    }
    schemas
}

/// Recursively collects every `Ref.pointer` reachable within `schema`,
/// inserting `New` entries for pointers not already tracked. Existing
/// `Seen` entries are left untouched (sticky).
fn collect_refs(schema: &Schema, states: &mut HashMap<String, RefState>) {
    match schema {
        Schema::Ref { pointer, .. } => {
            states.entry(pointer.clone()).or_insert(RefState::New);
        }
        Schema::Array { of } => collect_refs(of, states),
        Schema::Object { props } => {
            for v in props.values() {
                collect_refs(v, states);
            }
        }
        Schema::Union { of } => {
            for s in of {
                collect_refs(s, states);
            }
        }
        Schema::Prim { .. } | Schema::Any => {}
    }
}
