//! Store error taxonomy.

use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::{DocumentError, ValidationError};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Empty or malformed user input; shown to the user as-is.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("host not found: {0}")]
    HostNotFound(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// The persisted document changed after it was loaded.
    #[error("document changed since it was loaded; reload and retry")]
    Stale,
    #[error("invalid import: {0}")]
    InvalidImport(#[from] DocumentError),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Storage(StorageError::Json(e))
    }
}
