//! # Hierarchical Store
//!
//! Canonical representation of a mind-map document: a single root node that
//! exclusively owns its children. There are no parent back-pointers, so the
//! structure is a tree by construction.
//!
//! ```text
//! HierarchicalStructure
//!   └─ root: HierarchicalNode { data: Element, children: [...] }
//!              ├─ HierarchicalNode
//!              └─ HierarchicalNode
//!                   └─ ...
//! ```

use crate::element::{Element, ROOT_DEPTH};
use serde::{Deserialize, Serialize};

/// Current persisted format version
pub const FORMAT_VERSION: &str = "1.0";

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalNode {
    pub data: Element,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchicalNode>,
}

/// Root-anchored document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalStructure {
    pub root: HierarchicalNode,
    pub version: String,
}

impl HierarchicalNode {
    pub fn new(data: Element) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(data: Element, children: Vec<HierarchicalNode>) -> Self {
        let mut node = Self { data, children };
        node.data.child_count = node.children.len() as u32;
        node
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    /// Number of nodes in this subtree, including this one
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_size()).sum::<usize>()
    }

    /// Visit every element in this subtree, depth-first, pre-order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a HierarchicalNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Mutably visit every element in this subtree, depth-first, pre-order
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(&mut self.data);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Mutably visit every descendant, excluding this node
    pub fn walk_descendants_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Rewrite depths of this subtree so that this node sits at `depth`
    pub fn set_depth(&mut self, depth: u32) {
        self.data.depth = depth;
        for child in &mut self.children {
            child.set_depth(depth + 1);
        }
    }

    /// Reassign contiguous orders from vector position and refresh the count
    pub fn renumber_children(&mut self) {
        for (index, child) in self.children.iter_mut().enumerate() {
            child.data.order = index as u32;
        }
        self.data.child_count = self.children.len() as u32;
    }

    /// Stable-sort children by `order`, then renumber
    pub fn sort_children(&mut self) {
        self.children.sort_by_key(|c| c.data.order);
        self.renumber_children();
    }

    fn normalize_from(&mut self, depth: u32) {
        self.data.depth = depth;
        self.sort_children();
        for child in &mut self.children {
            child.normalize_from(depth + 1);
        }
    }
}

impl HierarchicalStructure {
    pub fn new(root: HierarchicalNode) -> Self {
        Self {
            root,
            version: FORMAT_VERSION.to_string(),
        }
    }

    /// Single-root document with the given root element
    pub fn with_root(root: Element) -> Self {
        Self::new(HierarchicalNode::new(root))
    }

    /// Recompute depth, child counts and sibling orders from the tree shape.
    ///
    /// Siblings keep their relative `order`; ties keep their current position.
    pub fn normalize(&mut self) {
        self.root.normalize_from(ROOT_DEPTH);
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
