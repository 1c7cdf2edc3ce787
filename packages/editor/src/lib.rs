//! # Mind-Map Editor
//!
//! Action-driven editing engine for mind-map documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: Action JSON { type, payload }         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Editor facade                       │
//! │  - layout adjuster after structural changes │
//! │  - clipboard store for captures             │
//! │  - drag positions restored on rejection     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ reducer: (state, action, config) → state    │
//! │  - mutations, drag, clipboard, tentative    │
//! │  - history snapshots (shared tree handles)  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ mindmap-tree: tree store + flat projection  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: the flat map is always re-projected
//! 2. **All-or-nothing actions**: a rejected action leaves the state as it was
//! 3. **Explicit configuration**: new elements never read ambient state
//!
//! ## Usage
//!
//! ```rust
//! use mindmap_editor::{Action, Editor, EditorConfig};
//!
//! let mut editor = Editor::with_root_text("Central topic", EditorConfig::default());
//! editor.dispatch(&Action::SelectElement {
//!     id: "1".to_string(),
//!     ctrl_key: false,
//!     shift_key: false,
//! })?;
//! editor.dispatch(&Action::AddElement)?;
//!
//! assert_eq!(editor.tree().element_count(), 2);
//!
//! editor.dispatch(&Action::Undo)?;
//! assert_eq!(editor.tree().element_count(), 1);
//! # Ok::<(), mindmap_editor::EditorError>(())
//! ```

mod action;
mod clipboard;
mod collaborators;
mod config;
mod drag;
mod editor;
mod errors;
mod history;
mod mutations;
mod reducer;
mod selection;
mod state;
mod tentative;

pub use action::{Action, GeometryUpdate, NavDirection};
pub use clipboard::{capture_subtree, paste_capture, Clipboard, ClipboardKind, PasteOutcome, SubtreeCapture};
pub use collaborators::{ClipboardStore, LayoutAdjuster, MemoryClipboardStore, TidyLayout};
pub use config::{EditorConfig, LayoutConfig, DEFAULT_MAX_DEPTH};
pub use drag::{execute_drop, moved_set, validate_parent_change, DropOutcome, DropRejection, DropRequest};
pub use editor::{DispatchResult, Editor};
pub use errors::{ActionError, EditorError};
pub use history::{History, Snapshot};
pub use reducer::reduce;
pub use selection::ClickModifiers;
pub use state::EditorState;

// Re-export tree types for convenience
pub use mindmap_tree::{Direction, Element, FlatMap, HierarchicalNode, HierarchicalStructure};
