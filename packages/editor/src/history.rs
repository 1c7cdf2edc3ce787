//! # Undo/Redo History
//!
//! Tracks tree snapshots and enables undo/redo.
//!
//! ## Design
//!
//! - A snapshot is a shared handle to an immutable tree, so recording one is
//!   O(1); the next mutation copies on write
//! - Undo swaps the current tree for the newest snapshot and keeps the current
//!   one for redo
//! - Redo is the mirror image
//! - Recording a new snapshot clears the redo stack
//! - The undo stack is bounded; the oldest entries fall off first

use mindmap_tree::HierarchicalStructure;
use std::sync::Arc;
use tracing::debug;

pub type Snapshot = Arc<HierarchicalStructure>;

/// Undo/redo stacks over tree snapshots
#[derive(Debug, Clone)]
pub struct History {
    /// Trees before each recorded change (most recent last)
    undo_stack: Vec<Snapshot>,

    /// Trees that were undone (most recent last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Create a history with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the tree as it was before a change
    pub fn record(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // A new change invalidates the undone future
        self.redo_stack.clear();
    }

    /// Step back: returns the tree to restore, remembering `current` for redo
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "undo");
        Some(previous)
    }

    /// Step forward: returns the tree to restore, remembering `current` for undo
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "redo");
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_tree::Element;

    fn tree(text: &str) -> Snapshot {
        Arc::new(HierarchicalStructure::with_root(Element::new("1", vec![text.to_string()])))
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_and_redo_swap_trees() {
        let mut history = History::new();
        let v0 = tree("v0");
        let v1 = tree("v1");

        history.record(v0.clone());

        let restored = history.undo(v1.clone()).unwrap();
        assert!(Arc::ptr_eq(&restored, &v0));
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert!(Arc::ptr_eq(&again, &v1));
        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::new();
        assert!(history.undo(tree("x")).is_none());
        assert!(history.redo(tree("x")).is_none());
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut history = History::new();
        history.record(tree("v0"));
        history.undo(tree("v1"));
        assert_eq!(history.redo_levels(), 1);

        history.record(tree("v0"));
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut history = History::with_max_levels(2);
        for i in 0..3 {
            history.record(tree(&format!("v{}", i)));
        }
        assert_eq!(history.undo_levels(), 2);
    }
}
