//! Trait abstractions for the repository's external collaborators.
//!
//! - [`ItemStore`] - durable item storage with a live observation
//! - [`CodeGenerator`] - time-based code computation
//! - [`ExportSink`] - destination for exported bytes

pub mod code_generator;
pub mod export_sink;
pub mod item_store;

pub use code_generator::CodeGenerator;
pub use export_sink::ExportSink;
pub use item_store::ItemStore;
