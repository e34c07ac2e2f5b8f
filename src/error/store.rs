//! Item store error types.

use thiserror::Error;

use super::category::ErrorCategory;

/// Faults raised by an [`ItemStore`](crate::traits::ItemStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the collection failed.
    #[error("Failed to read items: {0}")]
    Read(String),

    /// Persisting a change failed.
    #[error("Failed to write item: {0}")]
    Write(String),

    /// No item with the given identifier exists.
    #[error("Item not found: {id}")]
    NotFound { id: String },

    /// Filesystem error from a file-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted collection could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Storage
    }
}
