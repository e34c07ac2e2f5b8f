//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockItemStore`] - in-memory store with failure and panic switches
//! - [`MockCodeGenerator`] - scriptable per-item code streams
//! - [`MockExportSink`] - records exported data

pub mod code_generator;
pub mod export_sink;
pub mod item_store;

pub use code_generator::MockCodeGenerator;
pub use export_sink::MockExportSink;
pub use item_store::MockItemStore;
