//! Tree query and search utilities.
//!
//! Parent lookups re-traverse the tree; index paths are recomputed per call
//! and never cached alongside the tree.

use crate::element::Element;
use crate::node::{HierarchicalNode, HierarchicalStructure};
use std::collections::HashSet;

impl HierarchicalStructure {
    /// Index path from the root to `id` (empty for the root itself)
    pub fn path_to(&self, id: &str) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        if find_path(&self.root, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<&HierarchicalNode> {
        let mut node = &self.root;
        for &index in path {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Option<&mut HierarchicalNode> {
        let mut node = &mut self.root;
        for &index in path {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    pub fn find_node(&self, id: &str) -> Option<&HierarchicalNode> {
        let path = self.path_to(id)?;
        self.node_at_path(&path)
    }

    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut HierarchicalNode> {
        let path = self.path_to(id)?;
        self.node_at_path_mut(&path)
    }

    pub fn find_element(&self, id: &str) -> Option<&Element> {
        self.find_node(id).map(|n| &n.data)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.path_to(id).is_some()
    }

    /// Parent of `id`; `None` for the root or an unknown id
    pub fn find_parent_node(&self, id: &str) -> Option<&HierarchicalNode> {
        let path = self.path_to(id)?;
        let (_, parent_path) = path.split_last()?;
        self.node_at_path(parent_path)
    }

    pub fn parent_id(&self, id: &str) -> Option<&str> {
        self.find_parent_node(id).map(|n| n.id())
    }

    /// Direct children of `id`, in sibling order. Empty for an unknown id.
    pub fn get_children(&self, id: &str) -> Vec<&Element> {
        self.find_node(id)
            .map(|n| n.children.iter().map(|c| &c.data).collect())
            .unwrap_or_default()
    }

    /// Structural depth of `id` (root = 0); `None` when not found
    pub fn get_depth(&self, id: &str) -> Option<u32> {
        self.path_to(id).map(|p| p.len() as u32)
    }

    /// Every descendant of `id` in depth-first order, excluding `id` itself
    pub fn get_descendants(&self, id: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        if let Some(node) = self.find_node(id) {
            for child in &node.children {
                child.walk(&mut |n| out.push(&n.data));
            }
        }
        out
    }

    /// True when `id` lies strictly below `ancestor_id`
    pub fn is_descendant(&self, ancestor_id: &str, id: &str) -> bool {
        match (self.path_to(ancestor_id), self.path_to(id)) {
            (Some(ancestor), Some(path)) => path.len() > ancestor.len() && path.starts_with(&ancestor),
            _ => false,
        }
    }

    pub fn element_count(&self) -> usize {
        self.root.subtree_size()
    }

    /// Deepest structural depth in the tree
    pub fn max_depth(&self) -> u32 {
        fn deepest(node: &HierarchicalNode, depth: u32) -> u32 {
            node.children
                .iter()
                .map(|c| deepest(c, depth + 1))
                .max()
                .unwrap_or(depth)
        }
        deepest(&self.root, 0)
    }

    /// Every element id, depth-first
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.root.walk(&mut |n| ids.push(n.id()));
        ids
    }

    pub fn id_set(&self) -> HashSet<String> {
        self.ids().into_iter().map(str::to_string).collect()
    }

    /// All elements in depth-first order
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.root.walk(&mut |n| out.push(&n.data));
        out
    }

    /// Elements matching `predicate`, depth-first. With `max_depth`, nodes
    /// deeper than that structural depth are not visited.
    pub fn search<F>(&self, predicate: F, max_depth: Option<u32>) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut out = Vec::new();
        search_node(&self.root, 0, &predicate, max_depth, &mut out);
        out
    }
}

fn find_path(node: &HierarchicalNode, id: &str, path: &mut Vec<usize>) -> bool {
    if node.data.id == id {
        return true;
    }
    for (index, child) in node.children.iter().enumerate() {
        path.push(index);
        if find_path(child, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn search_node<'a, F>(
    node: &'a HierarchicalNode,
    depth: u32,
    predicate: &F,
    max_depth: Option<u32>,
    out: &mut Vec<&'a Element>,
) where
    F: Fn(&Element) -> bool,
{
    if max_depth.is_some_and(|max| depth > max) {
        return;
    }
    if predicate(&node.data) {
        out.push(&node.data);
    }
    for child in &node.children {
        search_node(child, depth + 1, predicate, max_depth, out);
    }
}
