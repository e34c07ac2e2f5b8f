//! Mock implementations for test fixtures.
//!
//! Re-exports the mocks from `totp_sync::adapters::mock` plus a code source
//! for driving the real ticking generator.

pub use totp_sync::adapters::mock::{MockCodeGenerator, MockExportSink, MockItemStore};

use chrono::{DateTime, Utc};
use totp_sync::adapters::CodeSource;
use totp_sync::error::StateError;
use totp_sync::models::Item;

/// Code source that renders the item key and the time step.
pub struct StepSource;

impl CodeSource for StepSource {
    fn generate(&self, item: &Item, at: DateTime<Utc>) -> Result<String, StateError> {
        if item.key.is_empty() {
            return Err(StateError::Generation("missing secret".to_string()));
        }
        let step = at.timestamp() / i64::from(item.period.max(1));
        Ok(format!("{}-{}", item.key, step))
    }
}
