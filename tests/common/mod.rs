//! Common test utilities for integration tests.
//!
//! Builds a [`Repository`] wired to the in-memory mocks and provides item
//! fixtures and a helper for waiting on view states.
//!
//! # Example
//!
//! ```ignore
//! let harness = TestRepoBuilder::new().with_items(sample_items()).build();
//! let mut codes = harness.repo.code_states().subscribe();
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use totp_sync::config::RepositoryConfig;
use totp_sync::data_state::DataState;
use totp_sync::models::Item;
use totp_sync::repository::Repository;
use totp_sync::shared::ViewSubscription;

/// Upper bound for any single wait in a test.
pub const WAIT: Duration = Duration::from_secs(10);

/// A TOTP item with a fixed id.
pub fn test_item(id: &str, issuer: &str) -> Item {
    Item::new_totp(format!("SECRET{}", id))
        .with_id(id)
        .with_issuer(issuer)
        .with_account_name(format!("{}@example.com", issuer.to_lowercase()))
}

/// Three items with distinct issuers, in insertion order.
pub fn sample_items() -> Vec<Item> {
    vec![
        test_item("1", "GitHub"),
        test_item("2", "GitLab").with_digits(8),
        test_item("3", "Bitbucket").with_period(60),
    ]
}

/// A repository together with handles on its mocks.
pub struct TestRepo {
    pub repo: Repository,
    pub store: MockItemStore,
    pub generator: MockCodeGenerator,
    pub sink: MockExportSink,
}

/// Builder for [`TestRepo`]. Must be built inside a Tokio runtime.
pub struct TestRepoBuilder {
    items: Vec<Item>,
    config: RepositoryConfig,
}

impl TestRepoBuilder {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            config: RepositoryConfig::default().with_stop_timeout(Duration::from_millis(50)),
        }
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TestRepo {
        let store = MockItemStore::with_items(self.items);
        let generator = MockCodeGenerator::new();
        let sink = MockExportSink::new();
        let repo = Repository::new(
            Arc::new(store.clone()),
            Arc::new(generator.clone()),
            Arc::new(sink.clone()),
            self.config,
            Handle::current(),
        );
        TestRepo {
            repo,
            store,
            generator,
            sink,
        }
    }
}

/// Wait until the subscription yields a state matching `pred`.
///
/// Panics if the view closes or nothing matches within [`WAIT`].
pub async fn wait_for<T, P>(subscription: &mut ViewSubscription<T>, mut pred: P) -> DataState<T>
where
    T: Clone + Send + Sync + 'static,
    P: FnMut(&DataState<T>) -> bool,
{
    let wait = async {
        loop {
            match subscription.next().await {
                Some(state) if pred(&state) => return state,
                Some(_) => continue,
                None => panic!("view closed while waiting"),
            }
        }
    };
    tokio::time::timeout(WAIT, wait)
        .await
        .expect("timed out waiting for view state")
}

/// Wait for the first `Loaded` state and return its payload.
pub async fn wait_loaded<T>(subscription: &mut ViewSubscription<T>) -> T
where
    T: Clone + Send + Sync + 'static,
{
    wait_for(subscription, DataState::is_loaded)
        .await
        .into_data()
        .expect("loaded state carries data")
}
