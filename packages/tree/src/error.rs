//! Error types for document loading

use thiserror::Error;

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unrecognized document shape: {0}")]
    UnrecognizedFormat(String),

    #[error("Document root is invalid: {0}")]
    InvalidRoot(String),

    #[error("Document must have exactly one root element, found {roots}")]
    NoUniqueRoot { roots: usize },
}
