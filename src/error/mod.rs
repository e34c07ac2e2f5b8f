//! Error handling for the synchronization core.
//!
//! - **Error Categories**: coarse classification for handling decisions
//! - **StoreError**: faults raised by an item store
//! - **StateError**: the cloneable error carried inside `DataState::Error`
//! - **ExportError**: export encoding failures
//!
//! Write-side faults never leave the repository as `Err`: they are converted
//! into the operation's outcome type. Read-side faults travel through the
//! derived views as `DataState::Error`.

mod category;
mod export;
mod state;
mod store;

pub use category::ErrorCategory;
pub use export::ExportError;
pub use state::StateError;
pub use store::StoreError;
