//! Export sink trait abstraction.

use std::path::Path;

use async_trait::async_trait;

/// Destination writer for exported data.
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Write `data` to `destination`, returning whether the write succeeded.
    async fn write(&self, destination: &Path, data: &str) -> bool;
}
