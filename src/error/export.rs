//! Export encoding errors.

use thiserror::Error;

use super::category::ErrorCategory;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    /// The encoder produced bytes that could not be turned into text.
    #[error("Export encoding failed: {0}")]
    Encoding(String),
}

impl ExportError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Export
    }
}
