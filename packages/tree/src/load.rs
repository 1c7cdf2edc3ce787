//! # Document Loading
//!
//! Accepts the canonical hierarchical format and the legacy flat shapes:
//!
//! ```text
//! { "root": { "data": {...}, "children": [...] }, "version": "1.0" }   canonical
//! [ { "id": ..., "parentId": ..., "depth": ... }, ... ]                 flat array
//! { "elements": [ ... ], "version": "..." }                             wrapped array
//! { "<id>": { "id": ..., "parentId": ... }, ... }                       legacy id map
//! ```
//!
//! Individually malformed elements (no usable id) and elements that cannot be
//! reached from the root are dropped with a warning and counted.
//! An unrecognized top-level shape, or data without a unique root, fails the
//! whole load. Loaded trees are normalized so every structural invariant holds.

use crate::element::Element;
use crate::error::{LoadError, LoadResult};
use crate::flat::{build_tree, FlatElement};
use crate::node::{HierarchicalNode, HierarchicalStructure, FORMAT_VERSION};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{info, warn};

/// Shape a document was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Hierarchical,
    FlatArray,
    ElementsWrapper,
    LegacyMap,
}

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub structure: HierarchicalStructure,
    pub format: DocumentFormat,

    /// Number of input elements missing from the loaded tree
    pub dropped: usize,
}

/// Parse JSON text in any supported format
pub fn parse_document(source: &str) -> LoadResult<LoadedDocument> {
    let value: Value = serde_json::from_str(source)?;
    load_document(&value)
}

/// Load an already-parsed JSON value in any supported format
pub fn load_document(value: &Value) -> LoadResult<LoadedDocument> {
    let format = detect_format(value)?;

    let (mut structure, dropped) = match format {
        DocumentFormat::Hierarchical => load_hierarchical(value)?,
        DocumentFormat::FlatArray => load_records(value.as_array().map(Vec::as_slice).unwrap_or(&[]))?,
        DocumentFormat::ElementsWrapper => {
            let elements = value
                .get("elements")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            load_records(elements)?
        }
        DocumentFormat::LegacyMap => {
            let values: Vec<Value> = value
                .as_object()
                .map(|m| m.values().cloned().collect())
                .unwrap_or_default();
            load_records(&values)?
        }
    };

    structure.version = FORMAT_VERSION.to_string();
    structure.normalize();

    info!(
        format = ?format,
        elements = structure.element_count(),
        dropped,
        "document loaded"
    );

    Ok(LoadedDocument {
        structure,
        format,
        dropped,
    })
}

/// Classify the top-level JSON shape
pub fn detect_format(value: &Value) -> LoadResult<DocumentFormat> {
    match value {
        Value::Array(_) => Ok(DocumentFormat::FlatArray),
        Value::Object(map) if map.contains_key("root") => Ok(DocumentFormat::Hierarchical),
        Value::Object(map) if map.get("elements").is_some_and(Value::is_array) => {
            Ok(DocumentFormat::ElementsWrapper)
        }
        Value::Object(map) if is_legacy_map(map) => Ok(DocumentFormat::LegacyMap),
        Value::Object(_) => Err(LoadError::UnrecognizedFormat(
            "object is neither a tree, an element list nor an id map".to_string(),
        )),
        other => Err(LoadError::UnrecognizedFormat(format!(
            "expected an object or array, found {}",
            json_kind(other)
        ))),
    }
}

fn is_legacy_map(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.values().all(Value::is_object)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn load_records(values: &[Value]) -> LoadResult<(HierarchicalStructure, usize)> {
    let mut dropped = 0;
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(values.len());

    for (index, value) in values.iter().enumerate() {
        match serde_json::from_value::<FlatElement>(value.clone()) {
            Ok(record) if seen.insert(record.element.id.clone()) => records.push(record),
            Ok(record) => {
                warn!(id = %record.element.id, "dropping element with duplicate id");
                dropped += 1;
            }
            Err(e) => {
                warn!(index, error = %e, "dropping malformed element");
                dropped += 1;
            }
        }
    }

    let roots = records.iter().filter(|r| r.parent_id.is_none()).count();
    let total = records.len();
    let structure = build_tree(records).ok_or(LoadError::NoUniqueRoot { roots })?;
    // Records whose parent chain never reaches the root are lost as well
    dropped += total - structure.element_count();
    Ok((structure, dropped))
}

fn load_hierarchical(value: &Value) -> LoadResult<(HierarchicalStructure, usize)> {
    let root_value = value
        .get("root")
        .ok_or_else(|| LoadError::UnrecognizedFormat("missing root".to_string()))?;

    let mut seen = HashSet::new();
    let mut dropped = 0;

    let data = root_value
        .get("data")
        .ok_or_else(|| LoadError::InvalidRoot("root node has no data".to_string()))?;
    let root_data: Element = serde_json::from_value(data.clone())
        .map_err(|e| LoadError::InvalidRoot(e.to_string()))?;
    seen.insert(root_data.id.clone());

    let mut root = HierarchicalNode::new(root_data);
    root.children = parse_children(root_value, &mut seen, &mut dropped);

    Ok((HierarchicalStructure::new(root), dropped))
}

fn parse_children(
    node_value: &Value,
    seen: &mut HashSet<String>,
    dropped: &mut usize,
) -> Vec<HierarchicalNode> {
    let Some(children) = node_value.get("children").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(children.len());
    for child in children {
        let parsed = child
            .get("data")
            .and_then(|d| serde_json::from_value::<Element>(d.clone()).ok());

        match parsed {
            Some(data) if seen.insert(data.id.clone()) => {
                let mut node = HierarchicalNode::new(data);
                node.children = parse_children(child, seen, dropped);
                nodes.push(node);
            }
            _ => {
                let size = count_nodes(child);
                warn!(dropped = size, "dropping malformed node and its subtree");
                *dropped += size;
            }
        }
    }
    nodes
}

fn count_nodes(value: &Value) -> usize {
    1 + value
        .get("children")
        .and_then(Value::as_array)
        .map(|c| c.iter().map(count_nodes).sum())
        .unwrap_or(0)
}
