//! Error carried inside [`DataState::Error`](crate::data_state::DataState).
//!
//! Every observer of a view receives its own copy of the current state, so the
//! error has to be cheap to clone and comparable in tests. Source errors are
//! flattened to their message at the point they enter a stream.

use thiserror::Error;

use super::category::ErrorCategory;
use super::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The item store failed to produce a snapshot.
    #[error("Item store error: {0}")]
    Store(String),

    /// The code generator could not compute a code.
    #[error("Code generation error: {0}")]
    Generation(String),
}

impl StateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StateError::Store(_) => ErrorCategory::Storage,
            StateError::Generation(_) => ErrorCategory::Generation,
        }
    }

    /// The message without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            StateError::Store(msg) | StateError::Generation(msg) => msg,
        }
    }
}

impl From<&StoreError> for StateError {
    fn from(err: &StoreError) -> Self {
        StateError::Store(err.to_string())
    }
}

impl From<StoreError> for StateError {
    fn from(err: StoreError) -> Self {
        StateError::from(&err)
    }
}
