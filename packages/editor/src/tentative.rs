//! Tentative staging: children proposed in bulk that the user later keeps or
//! discards as a group.

use crate::config::EditorConfig;
use crate::errors::ActionError;
use crate::mutations::{child_direction, new_element, node_mut};
use mindmap_tree::{HierarchicalNode, HierarchicalStructure, IdAllocator};
use tracing::debug;

/// Append one tentative child per text under `parent_id`; returns the new ids
pub fn add_elements_silent(
    tree: &mut HierarchicalStructure,
    parent_id: &str,
    texts: &[String],
    config: &EditorConfig,
    ids: &mut IdAllocator,
) -> Result<Vec<String>, ActionError> {
    let parent = node_mut(tree, parent_id)?;
    let depth = parent.data.depth + 1;
    let direction = child_direction(&parent.data, config);

    let mut added = Vec::with_capacity(texts.len());
    for text in texts {
        let id = ids.new_id();
        let mut element = new_element(id.clone(), config, depth, parent.children.len() as u32, direction);
        element.texts[0] = text.clone();
        element.tentative = true;
        parent.children.push(HierarchicalNode::new(element));
        added.push(id);
    }
    parent.renumber_children();

    debug!(parent = parent_id, count = added.len(), "tentative elements staged");
    Ok(added)
}

/// Keep the staged children of `parent_id`; returns how many were confirmed
pub fn confirm(tree: &mut HierarchicalStructure, parent_id: &str) -> Result<usize, ActionError> {
    let parent = node_mut(tree, parent_id)?;
    let mut confirmed = 0;
    for child in parent.children.iter_mut().filter(|c| c.data.tentative) {
        child.data.tentative = false;
        confirmed += 1;
    }
    debug!(parent = parent_id, confirmed, "tentative elements confirmed");
    Ok(confirmed)
}

/// Drop the staged children of `parent_id`; returns how many were removed
pub fn cancel(tree: &mut HierarchicalStructure, parent_id: &str) -> Result<usize, ActionError> {
    let parent = node_mut(tree, parent_id)?;
    let before = parent.children.len();
    parent.children.retain(|c| !c.data.tentative);
    parent.renumber_children();

    let removed = before - parent.children.len();
    debug!(parent = parent_id, removed, "tentative elements cancelled");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_tree::{validate, Element};

    fn doc() -> HierarchicalStructure {
        let mut tree = HierarchicalStructure::new(HierarchicalNode::with_children(
            Element::new("1", vec!["root".into()]),
            vec![HierarchicalNode::new(Element::new("2", vec!["kept".into()]))],
        ));
        tree.normalize();
        tree
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_staged_children_are_counted_immediately() {
        let mut tree = doc();
        let mut ids = IdAllocator::for_structure(&tree);
        let added = add_elements_silent(&mut tree, "1", &texts(&["a", "b"]), &EditorConfig::default(), &mut ids)
            .unwrap();

        assert_eq!(added, vec!["3", "4"]);
        assert_eq!(tree.root.data.child_count, 3);
        let staged = tree.find_element("4").unwrap();
        assert!(staged.tentative);
        assert!(!staged.selected);
        assert_eq!(staged.order, 2);
        assert_eq!(staged.title(), "b");
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_confirm_keeps_children() {
        let mut tree = doc();
        let mut ids = IdAllocator::for_structure(&tree);
        add_elements_silent(&mut tree, "1", &texts(&["a", "b"]), &EditorConfig::default(), &mut ids).unwrap();

        assert_eq!(confirm(&mut tree, "1").unwrap(), 2);
        assert!(tree.elements().iter().all(|e| !e.tentative));
        assert_eq!(tree.root.data.child_count, 3);
    }

    #[test]
    fn test_cancel_removes_and_compacts() {
        let mut tree = doc();
        let mut ids = IdAllocator::for_structure(&tree);
        add_elements_silent(&mut tree, "2", &texts(&["x"]), &EditorConfig::default(), &mut ids).unwrap();
        add_elements_silent(&mut tree, "1", &texts(&["a", "b"]), &EditorConfig::default(), &mut ids).unwrap();

        assert_eq!(cancel(&mut tree, "1").unwrap(), 2);
        assert_eq!(tree.root.data.child_count, 1);
        // staged grandchildren under another parent are untouched
        assert_eq!(tree.get_children("2").len(), 1);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_unknown_parent() {
        let mut tree = doc();
        assert!(matches!(confirm(&mut tree, "9"), Err(ActionError::ElementNotFound(_))));
    }
}
