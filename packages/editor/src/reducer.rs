//! # Command Reducer
//!
//! `reduce(state, action, config) -> new state` with no side effects. A
//! rejected action returns an error and the caller keeps the old state, so
//! every action is all-or-nothing.
//!
//! ## Flow
//!
//! ```text
//! clone state ──► apply action to copy-on-write tree ──► tree handle changed?
//!                                                          │ yes
//!                                 snapshotting action? ◄───┘
//!                                   │ yes: push old handle, clear redo
//!                                   ▼
//!                               reproject flat cache
//! ```

use crate::action::Action;
use crate::clipboard::{self, ClipboardKind};
use crate::config::EditorConfig;
use crate::drag::{self, DropRequest};
use crate::errors::ActionError;
use crate::mutations;
use crate::selection::{self, ClickModifiers};
use crate::state::EditorState;
use crate::tentative;
use mindmap_tree::{load_document, IdAllocator};
use std::sync::Arc;
use tracing::debug;

/// Apply `action` to `state`, returning the next state
pub fn reduce(
    state: &EditorState,
    action: &Action,
    config: &EditorConfig,
) -> Result<EditorState, ActionError> {
    let mut next = state.clone();
    let before = state.tree_handle();

    apply(&mut next, action, config)?;

    let mut changed = !Arc::ptr_eq(&before, &next.tree_handle());
    if changed && action.snapshots() && *before == *next.tree() {
        // Copied on write but ended up identical
        next.replace_tree(Arc::clone(&before));
        changed = false;
    }

    if changed {
        if action.snapshots() {
            next.history.record(before);
        }
        next.reproject();
    }

    debug!(
        action = action.name(),
        changed,
        undo = next.history.undo_levels(),
        redo = next.history.redo_levels(),
        "action reduced"
    );
    Ok(next)
}

fn selected(state: &EditorState) -> Result<String, ActionError> {
    state.first_selected().ok_or(ActionError::NothingSelected)
}

fn all_selected(state: &EditorState) -> Result<Vec<String>, ActionError> {
    let ids = state.selected_ids();
    if ids.is_empty() {
        return Err(ActionError::NothingSelected);
    }
    Ok(ids)
}

fn allocator(state: &EditorState) -> IdAllocator {
    IdAllocator::for_structure(state.tree()).starting_after(state.id_floor)
}

fn apply(state: &mut EditorState, action: &Action, config: &EditorConfig) -> Result<(), ActionError> {
    match action {
        Action::SelectElement {
            id,
            ctrl_key,
            shift_key,
        } => {
            let modifiers = ClickModifiers {
                ctrl: *ctrl_key,
                shift: *shift_key,
            };
            selection::select(state.tree_mut(), id, modifiers)
        }

        Action::DeselectAll => {
            selection::deselect_all(state.tree_mut());
            Ok(())
        }

        Action::AddElement => {
            let parent = selected(state)?;
            let mut ids = allocator(state);
            mutations::add_child(state.tree_mut(), &parent, config, &mut ids)?;
            state.id_floor = ids.high_water();
            Ok(())
        }

        Action::AddSiblingElement => {
            let anchor = selected(state)?;
            let mut ids = allocator(state);
            mutations::add_sibling(state.tree_mut(), &anchor, config, &mut ids)?;
            state.id_floor = ids.high_water();
            Ok(())
        }

        Action::AddElementsSilent { parent_id, texts } => {
            let mut ids = allocator(state);
            tentative::add_elements_silent(state.tree_mut(), parent_id, texts, config, &mut ids)?;
            state.id_floor = ids.high_water();
            Ok(())
        }

        Action::DeleteElement => {
            let ids = all_selected(state)?;
            mutations::delete_subtrees(state.tree_mut(), &ids).map(|_| ())
        }

        Action::EditElement => {
            let id = selected(state)?;
            mutations::begin_editing(state.tree_mut(), &id)
        }

        Action::EndEditing => {
            mutations::end_editing(state.tree_mut());
            Ok(())
        }

        Action::UpdateText { id, index, text } => {
            mutations::update_text(state.tree_mut(), id, *index, text)
        }

        Action::UpdateElementSize {
            id,
            width,
            height,
            section_heights,
        } => mutations::update_size(state.tree_mut(), id, *width, *height, section_heights),

        Action::UpdateMarker { id, marker } => {
            mutations::update_marker(state.tree_mut(), id, marker.as_deref())
        }

        Action::MoveElement { id, x, y } => mutations::move_element(state.tree_mut(), id, *x, *y),

        Action::DropElement {
            id,
            new_parent_id,
            new_order,
            direction,
        } => {
            let request = DropRequest {
                id: id.as_str(),
                new_parent_id: new_parent_id.as_str(),
                new_order: *new_order,
                direction: *direction,
            };
            // Validate against the shared tree first so a rejection never copies it
            drag::validate_parent_change(state.tree(), id, new_parent_id, config.max_depth)
                .map_err(|rejection| {
                    drag::report_rejection(&rejection);
                    rejection
                })?;
            drag::execute_drop(state.tree_mut(), &request, config.max_depth)
                .map(|_| ())
                .map_err(|rejection| {
                    drag::report_rejection(&rejection);
                    ActionError::from(rejection)
                })
        }

        Action::CollapseElement => {
            let ids = all_selected(state)?;
            selection::collapse(state.tree_mut(), &ids)
        }

        Action::ExpandElement => {
            let ids = all_selected(state)?;
            selection::expand(state.tree_mut(), &ids)
        }

        Action::Navigate { direction } => {
            let from = selected(state)?;
            selection::navigate(state.tree_mut(), &from, *direction).map(|_| ())
        }

        Action::CutElement => {
            let id = selected(state)?;
            if state.tree().parent_id(&id).is_none() {
                return Err(ActionError::CannotCutRoot);
            }
            let capture = clipboard::capture_subtree(state.tree(), &id)?;
            mutations::delete_subtrees(state.tree_mut(), &[id])?;
            state.clipboard.store(ClipboardKind::Cut, capture);
            Ok(())
        }

        Action::CopyElement => {
            let id = selected(state)?;
            let capture = clipboard::capture_subtree(state.tree(), &id)?;
            state.clipboard.store(ClipboardKind::Copy, capture);
            Ok(())
        }

        Action::PasteElement { target_id } => {
            let capture = state
                .clipboard
                .current()
                .cloned()
                .ok_or(ActionError::ClipboardEmpty)?;
            let target = match target_id {
                Some(id) => id.clone(),
                None => selected(state)?,
            };
            let mut ids = allocator(state);
            clipboard::paste_capture(state.tree_mut(), &capture, &target, config, &mut ids)?;
            state.id_floor = ids.high_water();
            Ok(())
        }

        Action::RestoreClipboard { capture } => {
            state.clipboard.store(ClipboardKind::Copy, capture.clone());
            Ok(())
        }

        Action::ConfirmTentativeElements { parent_id } => {
            tentative::confirm(state.tree_mut(), parent_id).map(|_| ())
        }

        Action::CancelTentativeElements { parent_id } => {
            tentative::cancel(state.tree_mut(), parent_id).map(|_| ())
        }

        Action::Undo => {
            let current = state.tree_handle();
            if let Some(previous) = state.history.undo(current) {
                state.replace_tree(previous);
            }
            Ok(())
        }

        Action::Redo => {
            let current = state.tree_handle();
            if let Some(next) = state.history.redo(current) {
                state.replace_tree(next);
            }
            Ok(())
        }

        Action::Snapshot => {
            let current = state.tree_handle();
            state.history.record(current);
            Ok(())
        }

        Action::LoadElements { data } => {
            let loaded = load_document(data)?;
            state.replace_tree(Arc::new(loaded.structure));
            state.history.clear();
            state.id_floor = 0;
            Ok(())
        }

        Action::ApplyLayout { updates } => {
            mutations::apply_layout(state.tree_mut(), updates);
            Ok(())
        }
    }
}
