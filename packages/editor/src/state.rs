//! Editor state: the canonical tree plus everything derived from or kept
//! alongside it between dispatches.

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::history::{History, Snapshot};
use mindmap_tree::{
    hierarchical_to_flat, Direction, Element, FlatMap, HierarchicalStructure,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct EditorState {
    tree: Snapshot,

    /// Projection of `tree`; rebuilt whenever the tree handle changes
    flat: Arc<FlatMap>,

    pub(crate) history: History,
    pub(crate) clipboard: Clipboard,

    /// Highest numeric id handed out in this session; deleted ids stay retired
    pub(crate) id_floor: u64,
}

impl EditorState {
    pub fn new(structure: HierarchicalStructure) -> Self {
        Self::with_history_limit(structure, History::new().max_levels())
    }

    pub fn with_history_limit(structure: HierarchicalStructure, max_levels: usize) -> Self {
        let tree = Arc::new(structure);
        let flat = Arc::new(hierarchical_to_flat(&tree));
        Self {
            tree,
            flat,
            history: History::with_max_levels(max_levels),
            clipboard: Clipboard::default(),
            id_floor: 0,
        }
    }

    /// Fresh document with a single root element
    pub fn with_root_text(text: impl Into<String>, config: &EditorConfig) -> Self {
        let mut texts = config.new_texts();
        texts[0] = text.into();
        let root = Element::new("1", texts).with_direction(Direction::None);
        Self::with_history_limit(HierarchicalStructure::with_root(root), config.history_limit)
    }

    pub fn tree(&self) -> &HierarchicalStructure {
        &self.tree
    }

    /// Shared handle to the current tree
    pub fn tree_handle(&self) -> Snapshot {
        Arc::clone(&self.tree)
    }

    pub fn flat(&self) -> &FlatMap {
        &self.flat
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Selected element ids in depth-first order
    pub fn selected_ids(&self) -> Vec<String> {
        self.tree
            .search(|e| e.selected, None)
            .into_iter()
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn first_selected(&self) -> Option<String> {
        self.tree.search(|e| e.selected, None).first().map(|e| e.id.clone())
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.tree.find_element(id)
    }

    /// Copy-on-write access to the tree
    pub(crate) fn tree_mut(&mut self) -> &mut HierarchicalStructure {
        Arc::make_mut(&mut self.tree)
    }

    pub(crate) fn replace_tree(&mut self, tree: Snapshot) {
        self.tree = tree;
    }

    /// Regenerate the flat cache from the tree
    pub(crate) fn reproject(&mut self) {
        self.flat = Arc::new(hierarchical_to_flat(&self.tree));
    }
}
