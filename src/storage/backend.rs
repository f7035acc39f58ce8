//! Key/value persistence seam.
//!
//! The store persists whole JSON blobs under a few fixed keys; where those
//! blobs live (files, an in-memory map, an extension storage bridge) is up to
//! the backend.

use std::future::Future;
use std::io;

use thiserror::Error;

/// Key of the host document blob.
pub const DOCUMENT_KEY: &str = "hostDocument";
/// Key of the settings blob.
pub const SETTINGS_KEY: &str = "settingsDocument";
/// Key of a page selection waiting to become a host.
pub const PENDING_SELECTION_KEY: &str = "pendingSelection";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("storage unavailable")]
    Unavailable,
}

/// Whole-value reads and writes. A `set` either replaces the value completely
/// or leaves the previous one in place.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Keys become file names, so only a conservative character set is allowed.
pub fn check_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
