//! # Clipboard
//!
//! Copy and cut capture a subtree into an independent flat map. Paste
//! rebuilds it under a target with fresh ids.
//!
//! ## Paste
//!
//! - Every captured id is remapped once; the table is a bijection and no new
//!   id collides with the document
//! - Parent links are rewritten through the same table
//! - Depths become `(d - capturedRootDepth) + target.depth + 1`
//! - The pasted root is appended as the target's last child and becomes the
//!   only selected element
//! - Below a non-root target the whole subtree takes the target's direction
//!
//! Captures round-trip through JSON so a host clipboard can hold them.

use crate::config::EditorConfig;
use crate::errors::ActionError;
use crate::mutations::{child_direction, deselect_all, node_mut};
use mindmap_tree::{
    flat_to_hierarchical, hierarchical_to_flat, Direction, Element, FlatMap, HierarchicalStructure,
    IdAllocator,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A detached subtree, keyed by its original ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtreeCapture {
    pub root_id: String,

    /// Captured elements; the root's `parentId` is cleared
    pub elements: FlatMap,
}

impl SubtreeCapture {
    pub fn root(&self) -> Option<&Element> {
        self.elements.get(&self.root_id).map(|f| &f.element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardKind {
    Copy,
    Cut,
}

/// Copy and cut buffers. Paste uses whichever was filled last.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    copied: Option<SubtreeCapture>,
    cut: Option<SubtreeCapture>,
    latest: Option<ClipboardKind>,
}

impl Clipboard {
    pub fn store(&mut self, kind: ClipboardKind, capture: SubtreeCapture) {
        match kind {
            ClipboardKind::Copy => self.copied = Some(capture),
            ClipboardKind::Cut => self.cut = Some(capture),
        }
        self.latest = Some(kind);
    }

    /// Capture that the next paste would insert
    pub fn current(&self) -> Option<&SubtreeCapture> {
        match self.latest? {
            ClipboardKind::Copy => self.copied.as_ref(),
            ClipboardKind::Cut => self.cut.as_ref(),
        }
    }

    pub fn latest_kind(&self) -> Option<ClipboardKind> {
        self.latest
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_none()
    }
}

/// Capture the subtree rooted at `id`
pub fn capture_subtree(tree: &HierarchicalStructure, id: &str) -> Result<SubtreeCapture, ActionError> {
    let node = tree
        .find_node(id)
        .ok_or_else(|| ActionError::ElementNotFound(id.to_string()))?;

    // Projecting a detached copy leaves the captured root without a parent
    let detached = HierarchicalStructure::new(node.clone());
    Ok(SubtreeCapture {
        root_id: id.to_string(),
        elements: hierarchical_to_flat(&detached),
    })
}

/// What a paste inserted
#[derive(Debug, Clone, PartialEq)]
pub struct PasteOutcome {
    /// New id of the pasted root
    pub root_id: String,

    /// Captured id → inserted id
    pub remap: HashMap<String, String>,
}

pub fn paste_capture(
    tree: &mut HierarchicalStructure,
    capture: &SubtreeCapture,
    target_id: &str,
    config: &EditorConfig,
    ids: &mut IdAllocator,
) -> Result<PasteOutcome, ActionError> {
    let target = tree
        .find_element(target_id)
        .ok_or_else(|| ActionError::ElementNotFound(target_id.to_string()))?;
    let target_depth = target.depth;
    let target_is_root = target.is_root();
    let fallback_direction = child_direction(target, config);

    let mut subtree = flat_to_hierarchical(&capture.elements)
        .filter(|s| s.root.id() == capture.root_id)
        .ok_or_else(|| ActionError::InvalidCapture(capture.root_id.clone()))?
        .root;

    let remap: HashMap<String, String> = {
        let mut remap = HashMap::new();
        subtree.walk(&mut |n| {
            remap.insert(n.id().to_string(), ids.new_id());
        });
        remap
    };

    let root_depth = subtree.data.depth;
    subtree.walk_mut(&mut |e| {
        if let Some(id) = remap.get(&e.id) {
            e.id = id.clone();
        }
        e.depth = (e.depth.saturating_sub(root_depth)) + target_depth + 1;
        e.selected = false;
        e.editing = false;
    });
    // Repairs captures restored from outside with inconsistent depths
    subtree.set_depth(target_depth + 1);
    // Under the root a captured side is kept; anywhere else the branch decides
    if !target_is_root || subtree.data.direction == Direction::None {
        let direction = fallback_direction;
        subtree.walk_mut(&mut |e| e.direction = direction);
    }
    subtree.data.selected = true;
    let root_id = subtree.data.id.clone();

    deselect_all(tree);
    let target = node_mut(tree, target_id)?;
    target.children.push(subtree);
    target.renumber_children();

    debug!(target = target_id, root = %root_id, elements = remap.len(), "subtree pasted");
    Ok(PasteOutcome { root_id, remap })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_tree::{validate, HierarchicalNode};
    use std::collections::HashSet;

    // 1
    // ├─ 2
    // │  └─ 3
    // │     └─ 4
    // └─ 5
    fn doc() -> HierarchicalStructure {
        let node = |id: &str, children| {
            HierarchicalNode::with_children(Element::new(id, vec![format!("text {}", id)]), children)
        };
        let mut tree = HierarchicalStructure::new(node(
            "1",
            vec![node("2", vec![node("3", vec![node("4", vec![])])]), node("5", vec![])],
        ));
        tree.normalize();
        tree
    }

    #[test]
    fn test_capture_is_independent() {
        let mut tree = doc();
        let capture = capture_subtree(&tree, "2").unwrap();
        tree.find_node_mut("3").unwrap().data.texts[0] = "changed".into();

        assert_eq!(capture.len(), 3);
        assert!(capture.elements["2"].parent_id.is_none());
        assert_eq!(capture.elements["4"].parent_id.as_deref(), Some("3"));
        assert_eq!(capture.elements["3"].element.title(), "text 3");
    }

    #[test]
    fn test_paste_remaps_every_id() {
        let mut tree = doc();
        let capture = capture_subtree(&tree, "2").unwrap();
        let mut ids = IdAllocator::for_structure(&tree);
        let before: HashSet<String> = tree.id_set();

        let outcome = paste_capture(&mut tree, &capture, "5", &EditorConfig::default(), &mut ids).unwrap();

        assert_eq!(outcome.remap.len(), 3);
        let new_ids: HashSet<&String> = outcome.remap.values().collect();
        assert_eq!(new_ids.len(), 3);
        assert!(new_ids.iter().all(|id| !before.contains(*id)));
        assert_eq!(tree.element_count(), 8);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_paste_rewrites_depth_and_selects_root() {
        let mut tree = doc();
        let capture = capture_subtree(&tree, "3").unwrap();
        let mut ids = IdAllocator::for_structure(&tree);

        let outcome = paste_capture(&mut tree, &capture, "1", &EditorConfig::default(), &mut ids).unwrap();

        let pasted = tree.find_element(&outcome.root_id).unwrap();
        assert_eq!(pasted.depth, 1);
        assert_eq!(pasted.order, 2);
        assert!(pasted.selected);
        assert_eq!(tree.root.data.child_count, 3);

        let child = &outcome.remap["4"];
        assert_eq!(tree.find_element(child).unwrap().depth, 2);
        assert_eq!(tree.parent_id(child), Some(outcome.root_id.as_str()));
        assert_eq!(tree.search(|e| e.selected, None).len(), 1);
    }

    #[test]
    fn test_paste_takes_direction_of_target_branch() {
        let mut tree = doc();
        tree.find_node_mut("2").unwrap().walk_mut(&mut |e| e.direction = Direction::Right);
        tree.find_node_mut("5").unwrap().data.direction = Direction::Left;
        let capture = capture_subtree(&tree, "2").unwrap();
        let mut ids = IdAllocator::for_structure(&tree);

        let outcome = paste_capture(&mut tree, &capture, "5", &EditorConfig::default(), &mut ids).unwrap();

        for id in outcome.remap.values() {
            assert_eq!(tree.find_element(id).unwrap().direction, Direction::Left);
        }
    }

    #[test]
    fn test_paste_under_root_keeps_captured_side() {
        let mut tree = doc();
        tree.find_node_mut("3").unwrap().walk_mut(&mut |e| e.direction = Direction::Left);
        let capture = capture_subtree(&tree, "3").unwrap();
        let mut ids = IdAllocator::for_structure(&tree);

        let outcome = paste_capture(&mut tree, &capture, "1", &EditorConfig::default(), &mut ids).unwrap();

        assert_eq!(tree.find_element(&outcome.root_id).unwrap().direction, Direction::Left);
        assert_eq!(tree.find_element(&outcome.remap["4"]).unwrap().direction, Direction::Left);
    }

    #[test]
    fn test_latest_buffer_wins() {
        let tree = doc();
        let mut clipboard = Clipboard::default();
        assert!(clipboard.is_empty());

        clipboard.store(ClipboardKind::Copy, capture_subtree(&tree, "2").unwrap());
        clipboard.store(ClipboardKind::Cut, capture_subtree(&tree, "5").unwrap());
        assert_eq!(clipboard.current().unwrap().root_id, "5");

        clipboard.store(ClipboardKind::Copy, capture_subtree(&tree, "3").unwrap());
        assert_eq!(clipboard.current().unwrap().root_id, "3");
        assert_eq!(clipboard.latest_kind(), Some(ClipboardKind::Copy));
    }

    #[test]
    fn test_capture_json_round_trip() {
        let tree = doc();
        let capture = capture_subtree(&tree, "2").unwrap();
        let json = capture.to_json().unwrap();

        assert!(json.contains("\"rootId\""));
        assert_eq!(SubtreeCapture::from_json(&json).unwrap(), capture);
    }

    #[test]
    fn test_paste_rejects_capture_without_root() {
        let mut tree = doc();
        let mut capture = capture_subtree(&tree, "2").unwrap();
        capture.root_id = "missing".into();
        let mut ids = IdAllocator::for_structure(&tree);

        let result = paste_capture(&mut tree, &capture, "1", &EditorConfig::default(), &mut ids);
        assert!(matches!(result, Err(ActionError::InvalidCapture(_))));
    }
}
