//! # Drag-Reparent Engine
//!
//! Validates and executes drops that change an element's parent or position.
//!
//! ## Validation
//!
//! - An element cannot become its own parent
//! - An element cannot move under its own subtree; a direct child target and
//!   a deeper descendant target are reported separately
//! - The target must sit above the configured maximum depth
//!
//! ## Drop modes
//!
//! ```text
//! child drop     (new_order = None)     moved set appended under target
//! between drop   (new_order = Some(n))  moved set inserted at slot n:
//!
//!     prev ─┐                      ┌─ next
//!   order k │  [moved set, size m] │ order k+1 → k+1+m, later siblings +m
//! ```
//!
//! Within the same parent only the siblings between the old and the new
//! position change order; the rest keep theirs.

use mindmap_tree::{Direction, HierarchicalNode, HierarchicalStructure};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a drop was refused
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DropRejection {
    #[error("Cannot drop {id} onto itself")]
    SelfParent { id: String },

    #[error("Cannot drop {id} onto its own child {target_id}")]
    DirectChildCycle { id: String, target_id: String },

    #[error("Dropping {id} under its descendant {target_id} would create a circular reference")]
    DeepCycle { id: String, target_id: String },

    #[error("Target {target_id} is at depth {depth}; drops are limited to depth {max_depth}")]
    MaxDepthExceeded {
        target_id: String,
        depth: u32,
        max_depth: u32,
    },

    #[error("Element not found: {id}")]
    ElementNotFound { id: String },

    #[error("Drop target not found: {id}")]
    TargetNotFound { id: String },
}

impl DropRejection {
    /// Stable machine-readable reason
    pub fn code(&self) -> &'static str {
        match self {
            DropRejection::SelfParent { .. } => "SELF_PARENT",
            DropRejection::DirectChildCycle { .. } => "DIRECT_CHILD_CYCLE",
            DropRejection::DeepCycle { .. } => "DEEP_CYCLE",
            DropRejection::MaxDepthExceeded { .. } => "MAX_DEPTH_EXCEEDED",
            DropRejection::ElementNotFound { .. } => "ELEMENT_NOT_FOUND",
            DropRejection::TargetNotFound { .. } => "TARGET_NOT_FOUND",
        }
    }
}

/// A requested drop
#[derive(Debug, Clone, PartialEq)]
pub struct DropRequest<'a> {
    pub id: &'a str,
    pub new_parent_id: &'a str,
    pub new_order: Option<u32>,
    pub direction: Option<Direction>,
}

/// What a successful drop did
#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    /// Elements relocated, in their new sibling order
    pub moved: Vec<String>,

    /// Order given to the first moved element
    pub base_order: u32,

    /// True when the moved set was already in place
    pub unchanged_order: bool,
}

/// Check whether `element_id` may become a child of `new_parent_id`
pub fn validate_parent_change(
    tree: &HierarchicalStructure,
    element_id: &str,
    new_parent_id: &str,
    max_depth: u32,
) -> Result<(), DropRejection> {
    let element_path = tree.path_to(element_id).ok_or_else(|| DropRejection::ElementNotFound {
        id: element_id.to_string(),
    })?;
    let target_path = tree.path_to(new_parent_id).ok_or_else(|| DropRejection::TargetNotFound {
        id: new_parent_id.to_string(),
    })?;

    if element_id == new_parent_id {
        return Err(DropRejection::SelfParent {
            id: element_id.to_string(),
        });
    }

    if target_path.len() > element_path.len() && target_path.starts_with(&element_path) {
        let (id, target_id) = (element_id.to_string(), new_parent_id.to_string());
        return Err(if target_path.len() == element_path.len() + 1 {
            DropRejection::DirectChildCycle { id, target_id }
        } else {
            DropRejection::DeepCycle { id, target_id }
        });
    }

    let depth = tree
        .node_at_path(&target_path)
        .map(|n| n.data.depth)
        .unwrap_or(target_path.len() as u32);
    if depth >= max_depth {
        return Err(DropRejection::MaxDepthExceeded {
            target_id: new_parent_id.to_string(),
            depth,
            max_depth,
        });
    }

    Ok(())
}

/// The dragged element plus every other selected sibling, in sibling order.
/// An unselected element is dragged on its own.
pub fn moved_set(tree: &HierarchicalStructure, id: &str) -> Vec<String> {
    let dragged_selected = tree.find_element(id).is_some_and(|e| e.selected);
    let Some(parent) = tree.find_parent_node(id).filter(|_| dragged_selected) else {
        return vec![id.to_string()];
    };

    parent
        .children
        .iter()
        .filter(|c| c.id() == id || c.data.selected)
        .map(|c| c.id().to_string())
        .collect()
}

/// Validate and perform a drop. On error the tree is untouched.
pub fn execute_drop(
    tree: &mut HierarchicalStructure,
    request: &DropRequest<'_>,
    max_depth: u32,
) -> Result<DropOutcome, DropRejection> {
    // The dragged element decides the reported reason.
    validate_parent_change(tree, request.id, request.new_parent_id, max_depth)?;

    let moved: Vec<String> = moved_set(tree, request.id)
        .into_iter()
        .filter(|id| id != request.new_parent_id)
        .collect();
    for id in &moved {
        validate_parent_change(tree, id, request.new_parent_id, max_depth)?;
    }

    let old_parent_id = tree.parent_id(request.id).map(str::to_string).ok_or_else(|| {
        DropRejection::DeepCycle {
            id: request.id.to_string(),
            target_id: request.new_parent_id.to_string(),
        }
    })?;
    let same_parent = old_parent_id == request.new_parent_id;

    let target = tree
        .find_node(request.new_parent_id)
        .ok_or_else(|| DropRejection::TargetNotFound {
            id: request.new_parent_id.to_string(),
        })?;
    let slot = resolve_slot(target, &moved, request.new_order);
    let target_depth = target.data.depth;
    let inherited = if target.data.is_root() {
        None
    } else {
        Some(target.data.direction)
    };

    if same_parent && slot.already_in_place {
        debug!(id = request.id, "drop leaves order unchanged");
        if let Some(direction) = request.direction {
            apply_direction(tree, &moved, direction);
        }
        return Ok(DropOutcome {
            moved,
            base_order: slot.base_order,
            unchanged_order: true,
        });
    }

    // Detach in sibling order, compacting the old parent
    let mut detached = Vec::with_capacity(moved.len());
    for id in &moved {
        let path = tree.path_to(id).ok_or_else(|| DropRejection::ElementNotFound { id: id.clone() })?;
        let Some((&index, parent_path)) = path.split_last() else {
            continue;
        };
        if let Some(parent) = tree.node_at_path_mut(parent_path) {
            detached.push(parent.children.remove(index));
            parent.renumber_children();
        }
    }

    let target = tree
        .find_node_mut(request.new_parent_id)
        .ok_or_else(|| DropRejection::TargetNotFound {
            id: request.new_parent_id.to_string(),
        })?;

    let index = slot.insert_index.min(target.children.len());
    for (offset, mut node) in detached.into_iter().enumerate() {
        node.set_depth(target_depth + 1);
        if let Some(direction) = request.direction.or(inherited) {
            node.walk_mut(&mut |e| e.direction = direction);
        }
        target.children.insert(index + offset, node);
    }
    target.renumber_children();

    let base_order = index as u32;
    debug!(
        id = request.id,
        target = request.new_parent_id,
        moved = moved.len(),
        base_order,
        "drop applied"
    );

    Ok(DropOutcome {
        moved,
        base_order,
        unchanged_order: false,
    })
}

/// Where a moved set lands among the target's remaining children
struct Slot {
    /// Position among the children that are not being moved
    insert_index: usize,

    /// Order the first moved element will take
    base_order: u32,

    /// Moved set already sits contiguously between the same neighbours
    already_in_place: bool,
}

fn resolve_slot(target: &HierarchicalNode, moved: &[String], new_order: Option<u32>) -> Slot {
    let is_moved = |node: &HierarchicalNode| moved.iter().any(|m| m == node.id());
    let remaining: Vec<&HierarchicalNode> = target.children.iter().filter(|c| !is_moved(*c)).collect();

    let Some(slot) = new_order else {
        // Child drop: after every remaining sibling
        return Slot {
            insert_index: remaining.len(),
            base_order: remaining.len() as u32,
            already_in_place: false,
        };
    };

    let slot = slot.min(target.children.len() as u32);
    let prev = remaining.iter().rev().find(|c| c.data.order < slot);
    let next = remaining.iter().find(|c| c.data.order >= slot);

    let insert_index = prev
        .and_then(|p| remaining.iter().position(|c| c.id() == p.id()))
        .map(|i| i + 1)
        .unwrap_or(0);

    // In the current numbering the moved set would start right after prev
    // (or before next); when the moved block already fills exactly that gap
    // nothing needs to change.
    let base_order = match (prev, next) {
        (_, Some(next)) => next.data.order,
        (Some(prev), None) => prev.data.order + 1,
        (None, None) => 0,
    };

    let lower = prev.map(|p| p.data.order + 1).unwrap_or(0);
    let upper = next
        .map(|n| n.data.order)
        .unwrap_or(target.children.len() as u32);
    let already_in_place = !moved.is_empty()
        && upper.saturating_sub(lower) as usize == moved.len()
        && target.children[lower as usize..upper as usize]
            .iter()
            .all(|c| is_moved(c));

    Slot {
        insert_index,
        base_order,
        already_in_place,
    }
}

fn apply_direction(tree: &mut HierarchicalStructure, ids: &[String], direction: Direction) {
    for id in ids {
        if let Some(node) = tree.find_node_mut(id) {
            node.walk_mut(&mut |e| e.direction = direction);
        }
    }
}

/// Log a rejected drop in one place
pub(crate) fn report_rejection(rejection: &DropRejection) {
    warn!(code = rejection.code(), reason = %rejection, "drop rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_tree::{validate, Element};

    fn leaf(id: &str) -> HierarchicalNode {
        HierarchicalNode::new(Element::new(id, vec![id.to_string()]))
    }

    fn node(id: &str, children: Vec<HierarchicalNode>) -> HierarchicalNode {
        HierarchicalNode::with_children(Element::new(id, vec![id.to_string()]), children)
    }

    // 1
    // ├─ a
    // │  └─ a1
    // │     └─ a2
    // ├─ b
    // ├─ c
    // └─ d
    fn doc() -> HierarchicalStructure {
        let mut tree = HierarchicalStructure::new(node(
            "1",
            vec![
                node("a", vec![node("a1", vec![leaf("a2")])]),
                leaf("b"),
                leaf("c"),
                leaf("d"),
            ],
        ));
        tree.normalize();
        tree
    }

    fn child_ids(tree: &HierarchicalStructure, id: &str) -> Vec<String> {
        tree.get_children(id).iter().map(|e| e.id.clone()).collect()
    }

    fn request<'a>(id: &'a str, target: &'a str, order: Option<u32>) -> DropRequest<'a> {
        DropRequest {
            id,
            new_parent_id: target,
            new_order: order,
            direction: None,
        }
    }

    #[test]
    fn test_rejects_self_parent() {
        let tree = doc();
        assert_eq!(
            validate_parent_change(&tree, "a", "a", 10).unwrap_err().code(),
            "SELF_PARENT"
        );
    }

    #[test]
    fn test_distinguishes_direct_and_deep_cycles() {
        let tree = doc();
        assert_eq!(
            validate_parent_change(&tree, "a", "a1", 10).unwrap_err().code(),
            "DIRECT_CHILD_CYCLE"
        );
        assert_eq!(
            validate_parent_change(&tree, "a", "a2", 10).unwrap_err().code(),
            "DEEP_CYCLE"
        );
    }

    #[test]
    fn test_rejects_targets_at_max_depth() {
        let tree = doc();
        let err = validate_parent_change(&tree, "b", "a2", 3).unwrap_err();
        assert_eq!(
            err,
            DropRejection::MaxDepthExceeded {
                target_id: "a2".into(),
                depth: 3,
                max_depth: 3
            }
        );
        assert!(validate_parent_change(&tree, "b", "a1", 3).is_ok());
    }

    #[test]
    fn test_child_drop_appends_and_updates_depth() {
        let mut tree = doc();
        let outcome = execute_drop(&mut tree, &request("d", "a1", None), 10).unwrap();

        assert_eq!(outcome.base_order, 1);
        assert_eq!(child_ids(&tree, "a1"), vec!["a2", "d"]);
        assert_eq!(tree.find_element("d").unwrap().depth, 3);
        assert_eq!(child_ids(&tree, "1"), vec!["a", "b", "c"]);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_subtree_depth_follows_moved_root() {
        let mut tree = doc();
        execute_drop(&mut tree, &request("a1", "d", None), 10).unwrap();

        assert_eq!(tree.find_element("a1").unwrap().depth, 2);
        assert_eq!(tree.find_element("a2").unwrap().depth, 3);
        assert_eq!(tree.find_element("a").unwrap().child_count, 0);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_between_drop_in_same_parent_moves_forward() {
        let mut tree = doc();
        // b to just before d
        execute_drop(&mut tree, &request("b", "1", Some(3)), 10).unwrap();

        assert_eq!(child_ids(&tree, "1"), vec!["a", "c", "b", "d"]);
        // outside the affected range
        assert_eq!(tree.find_element("a").unwrap().order, 0);
        assert_eq!(tree.find_element("d").unwrap().order, 3);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_between_drop_in_same_parent_moves_backward() {
        let mut tree = doc();
        execute_drop(&mut tree, &request("d", "1", Some(0)), 10).unwrap();
        assert_eq!(child_ids(&tree, "1"), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_between_drop_in_place_is_noop() {
        let mut tree = doc();
        let before = tree.clone();

        let outcome = execute_drop(&mut tree, &request("b", "1", Some(1)), 10).unwrap();
        assert!(outcome.unchanged_order);
        assert_eq!(tree, before);

        let outcome = execute_drop(&mut tree, &request("b", "1", Some(2)), 10).unwrap();
        assert!(outcome.unchanged_order);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_between_drop_into_other_parent() {
        let mut tree = doc();
        execute_drop(&mut tree, &request("c", "a", Some(0)), 10).unwrap();

        assert_eq!(child_ids(&tree, "a"), vec!["c", "a1"]);
        assert_eq!(child_ids(&tree, "1"), vec!["a", "b", "d"]);
        assert_eq!(tree.find_element("d").unwrap().order, 2);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_multi_selection_moves_together() {
        let mut tree = doc();
        tree.find_node_mut("b").unwrap().data.selected = true;
        tree.find_node_mut("c").unwrap().data.selected = true;

        let outcome = execute_drop(&mut tree, &request("b", "a", None), 10).unwrap();
        assert_eq!(outcome.moved, vec!["b", "c"]);
        assert_eq!(child_ids(&tree, "a"), vec!["a1", "b", "c"]);
        assert_eq!(child_ids(&tree, "1"), vec!["a", "d"]);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_unselected_drag_leaves_selected_siblings() {
        let mut tree = doc();
        tree.find_node_mut("c").unwrap().data.selected = true;

        let outcome = execute_drop(&mut tree, &request("b", "a", None), 10).unwrap();
        assert_eq!(outcome.moved, vec!["b"]);
        assert_eq!(child_ids(&tree, "a"), vec!["a1", "b"]);
        assert_eq!(child_ids(&tree, "1"), vec!["a", "c", "d"]);
        assert!(tree.find_element("c").unwrap().selected);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_direction_applies_to_subtree() {
        let mut tree = doc();
        let req = DropRequest {
            direction: Some(Direction::Left),
            ..request("a", "1", None)
        };
        execute_drop(&mut tree, &req, 10).unwrap();

        assert_eq!(tree.find_element("a").unwrap().direction, Direction::Left);
        assert_eq!(tree.find_element("a2").unwrap().direction, Direction::Left);
    }

    #[test]
    fn test_root_drop_is_rejected() {
        let mut tree = doc();
        let before = tree.clone();

        for target in ["1", "a", "a2", "d"] {
            assert!(execute_drop(&mut tree, &request("1", target, None), 10).is_err());
        }
        assert_eq!(tree, before);
    }
}
