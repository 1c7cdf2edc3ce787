//! # Element Mutations
//!
//! Creation, deletion and value edits applied to a (copy-on-write) tree.
//!
//! ## Semantics
//!
//! ### Add
//! - New element is appended (child) or inserted after the anchor (sibling)
//! - It becomes the only selected element and enters editing mode
//! - First-level elements get the configured direction, deeper ones inherit
//!
//! ### Delete
//! - Removes every selected non-root subtree
//! - Selection moves to the previous sibling, else the next one, else the
//!   parent
//!
//! ### Text / size / marker / coordinates
//! - Atomic replacement of the field; structure untouched

use crate::action::GeometryUpdate;
use crate::config::EditorConfig;
use crate::errors::ActionError;
use mindmap_tree::{Direction, Element, HierarchicalNode, HierarchicalStructure, IdAllocator};
use tracing::debug;

/// Build a fresh element from configuration
pub(crate) fn new_element(
    id: String,
    config: &EditorConfig,
    depth: u32,
    order: u32,
    direction: Direction,
) -> Element {
    Element::new(id, config.new_texts())
        .with_depth(depth)
        .with_order(order)
        .with_direction(direction)
}

/// Direction for a new child of `parent`
pub(crate) fn child_direction(parent: &Element, config: &EditorConfig) -> Direction {
    if parent.is_root() || parent.direction == Direction::None {
        config.default_direction
    } else {
        parent.direction
    }
}

pub(crate) fn deselect_all(tree: &mut HierarchicalStructure) {
    tree.root.walk_mut(&mut |e| {
        e.selected = false;
        e.editing = false;
    });
}

pub(crate) fn element_mut<'a>(
    tree: &'a mut HierarchicalStructure,
    id: &str,
) -> Result<&'a mut Element, ActionError> {
    tree.find_node_mut(id)
        .map(|n| &mut n.data)
        .ok_or_else(|| ActionError::ElementNotFound(id.to_string()))
}

pub(crate) fn node_mut<'a>(
    tree: &'a mut HierarchicalStructure,
    id: &str,
) -> Result<&'a mut HierarchicalNode, ActionError> {
    tree.find_node_mut(id)
        .ok_or_else(|| ActionError::ElementNotFound(id.to_string()))
}

/// Append a new child under `parent_id`; returns the new id
pub fn add_child(
    tree: &mut HierarchicalStructure,
    parent_id: &str,
    config: &EditorConfig,
    ids: &mut IdAllocator,
) -> Result<String, ActionError> {
    let parent = tree
        .find_element(parent_id)
        .ok_or_else(|| ActionError::ElementNotFound(parent_id.to_string()))?;
    let depth = parent.depth + 1;
    let direction = child_direction(parent, config);

    let id = ids.new_id();
    deselect_all(tree);

    let parent = node_mut(tree, parent_id)?;
    let mut element = new_element(id.clone(), config, depth, parent.children.len() as u32, direction);
    element.selected = true;
    element.editing = true;

    parent.children.push(HierarchicalNode::new(element));
    parent.renumber_children();

    debug!(parent = parent_id, id = %id, "element added");
    Ok(id)
}

/// Insert a new sibling right after `anchor_id`; returns the new id
pub fn add_sibling(
    tree: &mut HierarchicalStructure,
    anchor_id: &str,
    config: &EditorConfig,
    ids: &mut IdAllocator,
) -> Result<String, ActionError> {
    let anchor = tree
        .find_element(anchor_id)
        .ok_or_else(|| ActionError::ElementNotFound(anchor_id.to_string()))?;
    let (depth, order, direction) = (anchor.depth, anchor.order, anchor.direction);

    let parent_id = tree
        .parent_id(anchor_id)
        .map(str::to_string)
        .ok_or(ActionError::RootHasNoSiblings)?;

    let id = ids.new_id();
    deselect_all(tree);

    let parent = node_mut(tree, &parent_id)?;
    let index = (order as usize + 1).min(parent.children.len());
    let mut element = new_element(id.clone(), config, depth, index as u32, direction);
    element.selected = true;
    element.editing = true;

    parent.children.insert(index, HierarchicalNode::new(element));
    parent.renumber_children();

    debug!(anchor = anchor_id, id = %id, "sibling added");
    Ok(id)
}

/// Remove the subtrees rooted at `ids`. Returns the id that now holds the
/// selection.
pub fn delete_subtrees(
    tree: &mut HierarchicalStructure,
    ids: &[String],
) -> Result<String, ActionError> {
    // The root is never deleted; nested picks go with their ancestor.
    let candidates: Vec<&String> = ids.iter().filter(|id| tree.parent_id(id).is_some()).collect();
    let targets: Vec<&String> = candidates
        .iter()
        .copied()
        .filter(|id| !candidates.iter().any(|other| tree.is_descendant(other, id)))
        .collect();

    let Some(first) = targets.first() else {
        return Err(ActionError::CannotDeleteRoot);
    };

    let anchor_parent = tree
        .parent_id(first)
        .map(str::to_string)
        .ok_or(ActionError::CannotDeleteRoot)?;
    let anchor_index = tree
        .find_element(first)
        .map(|e| e.order as usize)
        .unwrap_or(0);

    let targets: Vec<String> = targets.into_iter().cloned().collect();
    for id in &targets {
        remove_subtree(tree, id)?;
    }

    deselect_all(tree);
    let parent = node_mut(tree, &anchor_parent)?;
    let next = if anchor_index > 0 && parent.children.len() >= anchor_index {
        &mut parent.children[anchor_index - 1].data
    } else if let Some(first_child) = parent.children.first_mut() {
        &mut first_child.data
    } else {
        &mut parent.data
    };
    next.selected = true;

    debug!(removed = targets.len(), selected = %next.id, "elements deleted");
    Ok(next.id.clone())
}

/// Detach the subtree rooted at `id` and compact its siblings' orders
pub(crate) fn remove_subtree(
    tree: &mut HierarchicalStructure,
    id: &str,
) -> Result<HierarchicalNode, ActionError> {
    let path = tree
        .path_to(id)
        .ok_or_else(|| ActionError::ElementNotFound(id.to_string()))?;
    let (&index, parent_path) = path.split_last().ok_or(ActionError::CannotDeleteRoot)?;

    let parent = tree
        .node_at_path_mut(parent_path)
        .ok_or_else(|| ActionError::ElementNotFound(id.to_string()))?;
    let removed = parent.children.remove(index);
    parent.renumber_children();
    Ok(removed)
}

/// Replace section `index` (or append at `index == len`); ends editing
pub fn update_text(
    tree: &mut HierarchicalStructure,
    id: &str,
    index: usize,
    text: &str,
) -> Result<(), ActionError> {
    let element = element_mut(tree, id)?;
    let len = element.texts.len();

    if index < len {
        element.texts[index] = text.to_string();
    } else if index == len {
        element.texts.push(text.to_string());
        element.section_heights.resize(element.texts.len(), 0.0);
    } else {
        return Err(ActionError::SectionOutOfRange {
            id: id.to_string(),
            index,
            len,
        });
    }

    element.editing = false;
    Ok(())
}

pub fn update_size(
    tree: &mut HierarchicalStructure,
    id: &str,
    width: f64,
    height: f64,
    section_heights: &[f64],
) -> Result<(), ActionError> {
    let element = element_mut(tree, id)?;
    element.width = width;
    element.height = height;
    element.section_heights = section_heights.to_vec();
    Ok(())
}

pub fn update_marker(
    tree: &mut HierarchicalStructure,
    id: &str,
    marker: Option<&str>,
) -> Result<(), ActionError> {
    element_mut(tree, id)?.marker = marker.map(str::to_string);
    Ok(())
}

/// Raw coordinate update while dragging
pub fn move_element(
    tree: &mut HierarchicalStructure,
    id: &str,
    x: f64,
    y: f64,
) -> Result<(), ActionError> {
    let element = element_mut(tree, id)?;
    element.x = x;
    element.y = y;
    Ok(())
}

/// Write layout results; updates for unknown ids are skipped
pub fn apply_layout(tree: &mut HierarchicalStructure, updates: &[GeometryUpdate]) -> usize {
    let mut applied = 0;
    for update in updates {
        let Some(node) = tree.find_node_mut(&update.id) else {
            debug!(id = %update.id, "layout update for unknown element");
            continue;
        };
        let element = &mut node.data;
        if let Some(x) = update.x {
            element.x = x;
        }
        if let Some(y) = update.y {
            element.y = y;
        }
        if let Some(width) = update.width {
            element.width = width;
        }
        if let Some(height) = update.height {
            element.height = height;
        }
        if let Some(heights) = &update.section_heights {
            element.section_heights = heights.clone();
        }
        applied += 1;
    }
    applied
}

/// Enter editing mode on `id` (which also becomes selected)
pub fn begin_editing(tree: &mut HierarchicalStructure, id: &str) -> Result<(), ActionError> {
    tree.root.walk_mut(&mut |e| e.editing = false);
    let element = element_mut(tree, id)?;
    element.selected = true;
    element.editing = true;
    Ok(())
}

pub fn end_editing(tree: &mut HierarchicalStructure) {
    tree.root.walk_mut(&mut |e| e.editing = false);
}
