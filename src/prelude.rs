//! Prelude module for convenient imports.
//!
//! ```ignore
//! use totp_sync::prelude::*;
//! ```

// State
pub use crate::data_state::{combine, combine_all, DataState};

// Repository and views
pub use crate::config::RepositoryConfig;
pub use crate::repository::{EventReceiver, ExportFormat, Repository};
pub use crate::shared::{SharedView, ViewSubscription};

// Model types
pub use crate::models::{
    AuthenticatorData, CodeView, CreateItemResult, DeleteItemResult, ExportDataResult, Item,
    ItemType, TotpCodeResult, UpdateItemRequest, UpdateItemResult,
};

// Collaborators
pub use crate::traits::{CodeGenerator, ExportSink, ItemStore};

// Errors
pub use crate::error::{ErrorCategory, StateError, StoreError};
