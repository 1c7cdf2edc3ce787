//! # Flat Projector
//!
//! Converts between the canonical tree and a flat `id → element` map with an
//! injected `parentId`. The flat map is a read model: it is always produced
//! from the tree, never edited and written back.

use crate::element::{de_opt_id, Element};
use crate::node::{HierarchicalNode, HierarchicalStructure};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Element plus the id of its parent (`None` for the root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatElement {
    #[serde(flatten)]
    pub element: Element,

    #[serde(rename = "parentId", default, deserialize_with = "de_opt_id")]
    pub parent_id: Option<String>,
}

/// Flat projection of a document, keyed by element id
pub type FlatMap = BTreeMap<String, FlatElement>;

impl FlatElement {
    pub fn new(element: Element, parent_id: Option<String>) -> Self {
        Self { element, parent_id }
    }

    pub fn id(&self) -> &str {
        &self.element.id
    }
}

/// Project a tree into a flat map. Depth-first; never fails.
pub fn hierarchical_to_flat(structure: &HierarchicalStructure) -> FlatMap {
    let mut map = FlatMap::new();
    project_node(&structure.root, None, &mut map);
    map
}

fn project_node(node: &HierarchicalNode, parent_id: Option<&str>, map: &mut FlatMap) {
    map.insert(
        node.data.id.clone(),
        FlatElement::new(node.data.clone(), parent_id.map(str::to_string)),
    );
    for child in &node.children {
        project_node(child, Some(&node.data.id), map);
    }
}

/// Rebuild a tree from a flat map.
///
/// Returns `None` when the map does not have exactly one parentless element.
pub fn flat_to_hierarchical(map: &FlatMap) -> Option<HierarchicalStructure> {
    build_tree(map.values().cloned().collect())
}

/// Build a tree from flat records. Siblings are ordered by `order`, ties by
/// record position.
pub(crate) fn build_tree(records: Vec<FlatElement>) -> Option<HierarchicalStructure> {
    let total = records.len();
    let mut roots = Vec::new();
    let mut by_parent: HashMap<String, Vec<Element>> = HashMap::new();

    for record in records {
        match record.parent_id {
            None => roots.push(record.element),
            Some(parent_id) => by_parent.entry(parent_id).or_default().push(record.element),
        }
    }

    if roots.len() != 1 {
        warn!(roots = roots.len(), "flat document does not have a unique root");
        return None;
    }

    let root_element = roots.remove(0);
    let root = attach_children(root_element, &mut by_parent);
    let structure = HierarchicalStructure::new(root);

    let reachable = structure.element_count();
    if reachable < total {
        warn!(
            dropped = total - reachable,
            "flat document contains elements unreachable from the root"
        );
    }

    Some(structure)
}

fn attach_children(
    element: Element,
    by_parent: &mut HashMap<String, Vec<Element>>,
) -> HierarchicalNode {
    let mut children = by_parent.remove(&element.id).unwrap_or_default();
    children.sort_by_key(|c| c.order);

    let children = children
        .into_iter()
        .map(|child| attach_children(child, by_parent))
        .collect();

    HierarchicalNode { data: element, children }
}
