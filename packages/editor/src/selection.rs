//! # Selection & Visibility
//!
//! Click selection, keyboard navigation and the collapse/expand cascade.
//!
//! Shift-click extends the selection over a sibling range: from the selected
//! sibling nearest to the clicked element up to and including it. With no
//! selected sibling it simply adds the clicked element.

use crate::action::NavDirection;
use crate::errors::ActionError;
use crate::mutations::element_mut;
use mindmap_tree::HierarchicalStructure;

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

pub fn select(
    tree: &mut HierarchicalStructure,
    id: &str,
    modifiers: ClickModifiers,
) -> Result<(), ActionError> {
    if !tree.contains(id) {
        return Err(ActionError::ElementNotFound(id.to_string()));
    }

    if modifiers.shift {
        select_range(tree, id)
    } else if modifiers.ctrl {
        let element = element_mut(tree, id)?;
        element.selected = !element.selected;
        if !element.selected {
            element.editing = false;
        }
        Ok(())
    } else {
        tree.root.walk_mut(&mut |e| {
            e.selected = e.id == id;
            if !e.selected {
                e.editing = false;
            }
        });
        Ok(())
    }
}

fn select_range(tree: &mut HierarchicalStructure, id: &str) -> Result<(), ActionError> {
    let Some(parent) = tree.find_parent_node(id) else {
        element_mut(tree, id)?.selected = true;
        return Ok(());
    };

    let target = parent
        .children
        .iter()
        .position(|c| c.id() == id)
        .ok_or_else(|| ActionError::ElementNotFound(id.to_string()))?;

    let anchor = parent
        .children
        .iter()
        .enumerate()
        .filter(|(index, c)| c.data.selected && *index != target)
        .min_by_key(|(index, _)| index.abs_diff(target))
        .map(|(index, _)| index);

    let parent_id = parent.id().to_string();
    let (from, to) = match anchor {
        Some(anchor) => (anchor.min(target), anchor.max(target)),
        None => (target, target),
    };

    let parent = tree
        .find_node_mut(&parent_id)
        .ok_or_else(|| ActionError::ElementNotFound(parent_id.clone()))?;
    for child in &mut parent.children[from..=to] {
        child.data.selected = true;
    }
    Ok(())
}

pub fn deselect_all(tree: &mut HierarchicalStructure) {
    crate::mutations::deselect_all(tree);
}

/// Hide every descendant of each id; the ids themselves stay visible
pub fn collapse(tree: &mut HierarchicalStructure, ids: &[String]) -> Result<(), ActionError> {
    set_descendant_visibility(tree, ids, false)
}

/// Reveal every descendant of each id, including independently collapsed
/// nested subtrees
pub fn expand(tree: &mut HierarchicalStructure, ids: &[String]) -> Result<(), ActionError> {
    set_descendant_visibility(tree, ids, true)
}

fn set_descendant_visibility(
    tree: &mut HierarchicalStructure,
    ids: &[String],
    visible: bool,
) -> Result<(), ActionError> {
    for id in ids {
        let node = tree
            .find_node_mut(id)
            .ok_or_else(|| ActionError::ElementNotFound(id.clone()))?;
        node.walk_descendants_mut(&mut |e| e.visible = visible);
    }
    Ok(())
}

/// Move the single selection from `from_id` in `direction`.
///
/// Returns the newly selected id, or `None` when there is nowhere to go.
pub fn navigate(
    tree: &mut HierarchicalStructure,
    from_id: &str,
    direction: NavDirection,
) -> Result<Option<String>, ActionError> {
    let node = tree
        .find_node(from_id)
        .ok_or_else(|| ActionError::ElementNotFound(from_id.to_string()))?;

    let destination = match direction {
        NavDirection::Left => tree.parent_id(from_id).map(str::to_string),
        NavDirection::Right => node
            .children
            .iter()
            .find(|c| c.data.visible)
            .map(|c| c.id().to_string()),
        NavDirection::Up | NavDirection::Down => {
            let order = node.data.order;
            tree.find_parent_node(from_id).and_then(|parent| {
                let mut visible = parent.children.iter().filter(|c| c.data.visible);
                let neighbour = if direction == NavDirection::Up {
                    visible.filter(|c| c.data.order < order).last()
                } else {
                    visible.find(|c| c.data.order > order)
                };
                neighbour.map(|c| c.id().to_string())
            })
        }
    };

    if let Some(target) = &destination {
        select(tree, target, ClickModifiers::default())?;
    }
    Ok(destination)
}
