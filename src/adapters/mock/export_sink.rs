//! Recording export sink for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::traits::ExportSink;

/// Export sink that keeps every write in memory.
#[derive(Debug, Clone, Default)]
pub struct MockExportSink {
    /// Accepted writes, in order
    writes: Arc<Mutex<Vec<(PathBuf, String)>>>,
    /// Whether writes should be rejected
    should_fail: Arc<Mutex<bool>>,
}

impl MockExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure whether writes should be rejected.
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.writes.lock().unwrap().clone()
    }

    /// Data of the most recent accepted write.
    pub fn last_data(&self) -> Option<String> {
        self.writes
            .lock()
            .unwrap()
            .last()
            .map(|(_, data)| data.clone())
    }
}

#[async_trait]
impl ExportSink for MockExportSink {
    async fn write(&self, destination: &Path, data: &str) -> bool {
        if *self.should_fail.lock().unwrap() {
            return false;
        }
        self.writes
            .lock()
            .unwrap()
            .push((destination.to_path_buf(), data.to_string()));
        true
    }
}
