//! Concrete implementations of the repository's collaborator traits.
//!
//! - [`JsonFileItemStore`] - items persisted as a JSON file
//! - [`TickingCodeGenerator`] - timer-driven codes from a [`CodeSource`]
//! - [`FileExportSink`] - exports written to the filesystem
//! - [`mock`] - test doubles for all three

pub mod file_sink;
pub mod json_file_store;
pub mod mock;
pub mod ticking_generator;

pub use file_sink::FileExportSink;
pub use json_file_store::JsonFileItemStore;
pub use ticking_generator::{time_left, CodeSource, TickingCodeGenerator, DEFAULT_TICK};
