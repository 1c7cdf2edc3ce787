//! # Editor
//!
//! Owns the current [`EditorState`] between dispatches and wires the reducer
//! to its collaborators:
//!
//! - after structural changes the layout adjuster repositions elements
//! - copy and cut captures are written to the clipboard store, and a paste
//!   with an empty in-memory buffer reads them back
//! - coordinates applied while dragging are restored when the drop is
//!   rejected

use crate::action::{Action, GeometryUpdate};
use crate::clipboard::SubtreeCapture;
use crate::collaborators::{ClipboardStore, LayoutAdjuster, MemoryClipboardStore};
use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::reducer::reduce;
use crate::state::EditorState;
use mindmap_tree::{parse_document, HierarchicalStructure};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a successful dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Document version after the dispatch
    pub version: u64,

    /// Whether the tree changed
    pub changed: bool,
}

pub struct Editor {
    state: EditorState,
    config: EditorConfig,
    layout: Option<Box<dyn LayoutAdjuster>>,
    clipboard_store: Box<dyn ClipboardStore>,

    /// Position of each element before the current drag moved it
    drag_origins: HashMap<String, (f64, f64)>,

    version: u64,
}

impl Editor {
    pub fn new(structure: HierarchicalStructure, config: EditorConfig) -> Self {
        let state = EditorState::with_history_limit(structure, config.history_limit);
        Self::from_state(state, config)
    }

    /// Editor for a single-root document
    pub fn with_root_text(text: impl Into<String>, config: EditorConfig) -> Self {
        let state = EditorState::with_root_text(text, &config);
        Self::from_state(state, config)
    }

    fn from_state(state: EditorState, config: EditorConfig) -> Self {
        Self {
            state,
            config,
            layout: None,
            clipboard_store: Box::new(MemoryClipboardStore::new()),
            drag_origins: HashMap::new(),
            version: 0,
        }
    }

    /// Load a document in any supported format
    pub fn from_json(source: &str, config: EditorConfig) -> Result<Self, EditorError> {
        let loaded = parse_document(source)?;
        Ok(Self::new(loaded.structure, config))
    }

    pub fn with_layout(mut self, layout: impl LayoutAdjuster + 'static) -> Self {
        self.layout = Some(Box::new(layout));
        self
    }

    pub fn with_clipboard_store(mut self, store: impl ClipboardStore + 'static) -> Self {
        self.clipboard_store = Box::new(store);
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tree(&self) -> &HierarchicalStructure {
        self.state.tree()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(self.state.tree().to_json_pretty()?)
    }

    /// Dispatch an action given as JSON
    pub fn dispatch_json(&mut self, source: &str) -> Result<DispatchResult, EditorError> {
        let action: Action = serde_json::from_str(source)?;
        self.dispatch(&action)
    }

    /// Apply an action. On error the state is unchanged, except that a
    /// rejected drop restores the positions the drag had moved.
    pub fn dispatch(&mut self, action: &Action) -> Result<DispatchResult, EditorError> {
        debug!(action = action.name(), version = self.version, "dispatch");

        if matches!(action, Action::PasteElement { .. }) {
            self.restore_clipboard()?;
        }
        match action {
            Action::MoveElement { id, .. } => self.remember_drag_origin(id),
            Action::DropElement { .. } => {}
            // Any other action ends an unfinished drag
            _ => self.drag_origins.clear(),
        }

        let before = self.state.tree_handle();
        let next = match reduce(&self.state, action, &self.config) {
            Ok(next) => next,
            Err(err) => {
                let err = EditorError::from(err);
                if err.drop_rejection().is_some() {
                    self.restore_drag_origins()?;
                }
                return Err(err);
            }
        };
        self.state = next;

        if matches!(action, Action::DropElement { .. }) {
            self.drag_origins.clear();
        }
        if matches!(action, Action::CopyElement | Action::CutElement) {
            self.publish_clipboard()?;
        }
        if action.needs_layout() {
            self.run_layout()?;
        }

        let changed = !Arc::ptr_eq(&before, &self.state.tree_handle());
        if changed {
            self.version += 1;
        }
        Ok(DispatchResult {
            version: self.version,
            changed,
        })
    }

    fn remember_drag_origin(&mut self, id: &str) {
        if self.drag_origins.contains_key(id) {
            return;
        }
        if let Some(element) = self.state.element(id) {
            self.drag_origins.insert(id.to_string(), (element.x, element.y));
        }
    }

    fn restore_drag_origins(&mut self) -> Result<(), EditorError> {
        if self.drag_origins.is_empty() {
            return Ok(());
        }
        let updates = self
            .drag_origins
            .drain()
            .map(|(id, (x, y))| GeometryUpdate {
                id,
                x: Some(x),
                y: Some(y),
                ..GeometryUpdate::default()
            })
            .collect();
        debug!("restoring drag origins");
        self.state = reduce(&self.state, &Action::ApplyLayout { updates }, &self.config)?;
        Ok(())
    }

    fn publish_clipboard(&mut self) -> Result<(), EditorError> {
        if let Some(capture) = self.state.clipboard().current() {
            self.clipboard_store.set(capture.to_json()?);
        }
        Ok(())
    }

    fn restore_clipboard(&mut self) -> Result<(), EditorError> {
        if !self.state.clipboard().is_empty() {
            return Ok(());
        }
        let Some(text) = self.clipboard_store.get() else {
            return Ok(());
        };
        match SubtreeCapture::from_json(&text) {
            Ok(capture) => {
                self.state = reduce(&self.state, &Action::RestoreClipboard { capture }, &self.config)?;
            }
            Err(e) => warn!(error = %e, "ignoring unreadable clipboard contents"),
        }
        Ok(())
    }

    fn run_layout(&mut self) -> Result<(), EditorError> {
        let Some(layout) = &self.layout else {
            return Ok(());
        };
        let updates = layout.adjust(self.state.flat(), &self.config.layout);
        if updates.is_empty() {
            return Ok(());
        }
        self.state = reduce(&self.state, &Action::ApplyLayout { updates }, &self.config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::TidyLayout;

    fn select(id: &str) -> Action {
        Action::SelectElement {
            id: id.to_string(),
            ctrl_key: false,
            shift_key: false,
        }
    }

    #[test]
    fn test_version_tracks_tree_changes() {
        let mut editor = Editor::with_root_text("Central", EditorConfig::default());

        let result = editor.dispatch(&select("1")).unwrap();
        assert_eq!(result.version, 1);

        let result = editor.dispatch(&Action::CopyElement).unwrap();
        assert!(!result.changed);
        assert_eq!(result.version, 1);
    }

    #[test]
    fn test_rejected_drop_restores_drag_position() {
        let mut editor = Editor::with_root_text("Central", EditorConfig::default());
        editor.dispatch(&select("1")).unwrap();
        editor.dispatch(&Action::AddElement).unwrap();
        editor.dispatch(&Action::AddElement).unwrap();

        let origin = {
            let e = editor.state().element("2").unwrap();
            (e.x, e.y)
        };
        for step in 1..=3 {
            editor
                .dispatch(&Action::MoveElement {
                    id: "2".into(),
                    x: 10.0 * step as f64,
                    y: 5.0,
                })
                .unwrap();
        }

        let err = editor
            .dispatch(&Action::DropElement {
                id: "2".into(),
                new_parent_id: "3".into(),
                new_order: None,
                direction: None,
            })
            .unwrap_err();

        assert_eq!(err.drop_rejection().map(|r| r.code()), Some("DIRECT_CHILD_CYCLE"));
        let e = editor.state().element("2").unwrap();
        assert_eq!((e.x, e.y), origin);
    }

    #[test]
    fn test_abandoned_drag_is_not_restored_later() {
        let mut editor = Editor::with_root_text("Central", EditorConfig::default());
        editor.dispatch(&select("1")).unwrap();
        editor.dispatch(&Action::AddElement).unwrap();
        editor.dispatch(&Action::AddElement).unwrap();

        editor
            .dispatch(&Action::MoveElement {
                id: "2".into(),
                x: 500.0,
                y: 500.0,
            })
            .unwrap();
        editor
            .dispatch(&Action::UpdateText {
                id: "3".into(),
                index: 0,
                text: "renamed".into(),
            })
            .unwrap();

        let origin = {
            let e = editor.state().element("3").unwrap();
            (e.x, e.y)
        };
        editor
            .dispatch(&Action::MoveElement {
                id: "3".into(),
                x: 40.0,
                y: 40.0,
            })
            .unwrap();
        let err = editor
            .dispatch(&Action::DropElement {
                id: "3".into(),
                new_parent_id: "3".into(),
                new_order: None,
                direction: None,
            })
            .unwrap_err();

        assert_eq!(err.drop_rejection().map(|r| r.code()), Some("SELF_PARENT"));
        let moved = editor.state().element("2").unwrap();
        assert_eq!((moved.x, moved.y), (500.0, 500.0));
        let dragged = editor.state().element("3").unwrap();
        assert_eq!((dragged.x, dragged.y), origin);
    }

    #[test]
    fn test_paste_reads_clipboard_store() {
        let mut first = Editor::with_root_text("Central", EditorConfig::default());
        first.dispatch(&select("1")).unwrap();
        first.dispatch(&Action::AddElement).unwrap();
        first.dispatch(&Action::CopyElement).unwrap();

        let mut store = MemoryClipboardStore::new();
        let capture = first.state().clipboard().current().unwrap().to_json().unwrap();
        store.set(capture);

        let mut second = Editor::with_root_text("Other", EditorConfig::default()).with_clipboard_store(store);
        second.dispatch(&select("1")).unwrap();
        second.dispatch(&Action::PasteElement { target_id: None }).unwrap();

        assert_eq!(second.tree().element_count(), 2);
        assert_eq!(second.tree().root.data.child_count, 1);
    }

    #[test]
    fn test_layout_runs_after_structural_change() {
        let mut editor = Editor::with_root_text("Central", EditorConfig::default()).with_layout(TidyLayout::default());
        editor.dispatch(&select("1")).unwrap();
        editor.dispatch(&Action::AddElement).unwrap();

        let root = editor.state().element("1").unwrap();
        let child = editor.state().element("2").unwrap();
        assert!(child.x > root.x);
        // layout positions are not an undo step
        assert_eq!(editor.state().history().undo_levels(), 1);
    }

    #[test]
    fn test_dispatch_json() {
        let mut editor = Editor::with_root_text("Central", EditorConfig::default());
        editor
            .dispatch_json(r#"{ "type": "SELECT_ELEMENT", "payload": { "id": "1" } }"#)
            .unwrap();
        editor.dispatch_json(r#"{ "type": "ADD_ELEMENT" }"#).unwrap();
        assert_eq!(editor.tree().element_count(), 2);
    }
}
