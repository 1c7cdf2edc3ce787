//! # Action Protocol
//!
//! Closed set of operations the host can dispatch. Serialized as
//! `{ "type": "ADD_ELEMENT", "payload": { ... } }`.
//!
//! ## History policy
//!
//! Actions that change structure or values snapshot the tree before they
//! apply (see [`Action::snapshots`]). Pure UI-state actions (selection,
//! dragging coordinates, visibility, editing mode, geometry from layout) do
//! not, so undo never lands on an intermediate drag position.

use crate::clipboard::SubtreeCapture;
use mindmap_tree::Direction;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Click selection: replace, toggle with ctrl, extend with shift
    #[serde(rename_all = "camelCase")]
    SelectElement {
        id: String,
        #[serde(default)]
        ctrl_key: bool,
        #[serde(default)]
        shift_key: bool,
    },

    DeselectAll,

    /// Append a child to the selected element
    AddElement,

    /// Insert a sibling right after the selected element
    AddSiblingElement,

    /// Stage tentative children, one per text
    #[serde(rename_all = "camelCase")]
    AddElementsSilent { parent_id: String, texts: Vec<String> },

    /// Remove the selected subtree(s)
    DeleteElement,

    /// Enter editing mode on the selected element
    EditElement,

    EndEditing,

    #[serde(rename_all = "camelCase")]
    UpdateText { id: String, index: usize, text: String },

    #[serde(rename_all = "camelCase")]
    UpdateElementSize {
        id: String,
        width: f64,
        height: f64,
        section_heights: Vec<f64>,
    },

    #[serde(rename_all = "camelCase")]
    UpdateMarker {
        id: String,
        #[serde(default)]
        marker: Option<String>,
    },

    /// Raw coordinates while dragging; structure is untouched
    #[serde(rename_all = "camelCase")]
    MoveElement { id: String, x: f64, y: f64 },

    /// Reparent. `new_order = None` drops as last child, `Some(n)` drops
    /// between siblings at slot `n`.
    #[serde(rename_all = "camelCase")]
    DropElement {
        id: String,
        new_parent_id: String,
        #[serde(default)]
        new_order: Option<u32>,
        #[serde(default)]
        direction: Option<Direction>,
    },

    CollapseElement,
    ExpandElement,

    /// Move the selection with the keyboard
    #[serde(rename_all = "camelCase")]
    Navigate { direction: NavDirection },

    CutElement,
    CopyElement,

    /// Paste the clipboard under `target_id`, or the selected element
    #[serde(rename_all = "camelCase")]
    PasteElement {
        #[serde(default)]
        target_id: Option<String>,
    },

    /// Load a capture from an external clipboard store
    #[serde(rename_all = "camelCase")]
    RestoreClipboard { capture: SubtreeCapture },

    #[serde(rename_all = "camelCase")]
    ConfirmTentativeElements { parent_id: String },

    #[serde(rename_all = "camelCase")]
    CancelTentativeElements { parent_id: String },

    Undo,
    Redo,
    Snapshot,

    /// Replace the document from current or legacy JSON
    #[serde(rename_all = "camelCase")]
    LoadElements { data: Value },

    /// Geometry computed by the layout collaborator
    #[serde(rename_all = "camelCase")]
    ApplyLayout { updates: Vec<GeometryUpdate> },
}

/// Keyboard navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Geometry for one element; `None` fields are left as they are
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryUpdate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_heights: Option<Vec<f64>>,
}

impl Action {
    /// Wire name of this action
    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectElement { .. } => "SELECT_ELEMENT",
            Action::DeselectAll => "DESELECT_ALL",
            Action::AddElement => "ADD_ELEMENT",
            Action::AddSiblingElement => "ADD_SIBLING_ELEMENT",
            Action::AddElementsSilent { .. } => "ADD_ELEMENTS_SILENT",
            Action::DeleteElement => "DELETE_ELEMENT",
            Action::EditElement => "EDIT_ELEMENT",
            Action::EndEditing => "END_EDITING",
            Action::UpdateText { .. } => "UPDATE_TEXT",
            Action::UpdateElementSize { .. } => "UPDATE_ELEMENT_SIZE",
            Action::UpdateMarker { .. } => "UPDATE_MARKER",
            Action::MoveElement { .. } => "MOVE_ELEMENT",
            Action::DropElement { .. } => "DROP_ELEMENT",
            Action::CollapseElement => "COLLAPSE_ELEMENT",
            Action::ExpandElement => "EXPAND_ELEMENT",
            Action::Navigate { .. } => "NAVIGATE",
            Action::CutElement => "CUT_ELEMENT",
            Action::CopyElement => "COPY_ELEMENT",
            Action::PasteElement { .. } => "PASTE_ELEMENT",
            Action::RestoreClipboard { .. } => "RESTORE_CLIPBOARD",
            Action::ConfirmTentativeElements { .. } => "CONFIRM_TENTATIVE_ELEMENTS",
            Action::CancelTentativeElements { .. } => "CANCEL_TENTATIVE_ELEMENTS",
            Action::Undo => "UNDO",
            Action::Redo => "REDO",
            Action::Snapshot => "SNAPSHOT",
            Action::LoadElements { .. } => "LOAD_ELEMENTS",
            Action::ApplyLayout { .. } => "APPLY_LAYOUT",
        }
    }

    /// Whether the tree is pushed onto the undo stack before applying
    pub fn snapshots(&self) -> bool {
        matches!(
            self,
            Action::AddElement
                | Action::AddSiblingElement
                | Action::AddElementsSilent { .. }
                | Action::DeleteElement
                | Action::UpdateText { .. }
                | Action::UpdateMarker { .. }
                | Action::DropElement { .. }
                | Action::CutElement
                | Action::PasteElement { .. }
                | Action::ConfirmTentativeElements { .. }
                | Action::CancelTentativeElements { .. }
        )
    }

    /// Whether a successful application may change the tree shape or text,
    /// so positions need recomputing
    pub fn needs_layout(&self) -> bool {
        self.snapshots()
            || matches!(
                self,
                Action::Undo
                    | Action::Redo
                    | Action::LoadElements { .. }
                    | Action::CollapseElement
                    | Action::ExpandElement
                    | Action::UpdateElementSize { .. }
            )
    }
}
