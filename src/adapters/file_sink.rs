//! Export sink writing to the local filesystem.

use std::path::Path;

use async_trait::async_trait;
use tracing::warn;

use crate::traits::ExportSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileExportSink;

impl FileExportSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExportSink for FileExportSink {
    async fn write(&self, destination: &Path, data: &str) -> bool {
        match tokio::fs::write(destination, data).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write export to {:?}: {}", destination, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.csv");

        assert!(FileExportSink::new().write(&path, "a,b\n").await);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("export.csv");

        assert!(!FileExportSink::new().write(&path, "data").await);
    }
}
