//! Error types for the editor

use crate::drag::DropRejection;
use mindmap_tree::LoadError;
use thiserror::Error;

/// Why a dispatched action was rejected. The state is left unchanged.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("No element is selected")]
    NothingSelected,

    #[error("The root element cannot be deleted")]
    CannotDeleteRoot,

    #[error("The root element cannot be cut")]
    CannotCutRoot,

    #[error("The root element has no siblings")]
    RootHasNoSiblings,

    #[error("Section {index} is out of range for element {id} ({len} sections)")]
    SectionOutOfRange { id: String, index: usize, len: usize },

    #[error("Clipboard is empty")]
    ClipboardEmpty,

    #[error("Clipboard capture has no single root {0}")]
    InvalidCapture(String),

    #[error("Drop rejected: {0}")]
    Drop(#[from] DropRejection),

    #[error("Load failed: {0}")]
    Load(#[from] LoadError),
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    /// Drop rejection carried by this error, if any
    pub fn drop_rejection(&self) -> Option<&DropRejection> {
        match self {
            EditorError::Action(ActionError::Drop(rejection)) => Some(rejection),
            _ => None,
        }
    }
}
