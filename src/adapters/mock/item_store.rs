//! In-memory item store for testing.
//!
//! Publishes every committed change to observers like the real store, and can
//! be told to fail writes, panic inside writes, or surface read errors on the
//! live observation.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use crate::error::StoreError;
use crate::models::Item;
use crate::shared::watch_stream;
use crate::traits::ItemStore;

type Snapshot = Result<Vec<Item>, String>;

/// In-memory item store for testing.
///
/// # Example
///
/// ```ignore
/// use totp_sync::adapters::mock::MockItemStore;
/// use totp_sync::traits::ItemStore;
///
/// let store = MockItemStore::with_items(vec![item]);
/// store.set_save_should_fail(true);
/// assert!(store.save_item(&other).await.is_err());
///
/// // Observers see a read fault without the stream ending
/// store.push_read_error("disk unplugged");
/// ```
#[derive(Debug, Clone)]
pub struct MockItemStore {
    /// Committed items
    items: Arc<Mutex<Vec<Item>>>,
    /// Live feed of snapshots and read faults
    feed: Arc<watch::Sender<Snapshot>>,
    /// Whether save should fail
    save_should_fail: Arc<Mutex<bool>>,
    /// Whether delete should fail
    delete_should_fail: Arc<Mutex<bool>>,
    /// Whether writes should panic
    writes_should_panic: Arc<Mutex<bool>>,
    /// Number of live observations opened
    observe_count: Arc<AtomicUsize>,
}

impl MockItemStore {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a store holding `items`.
    pub fn with_items(items: Vec<Item>) -> Self {
        let (feed, _) = watch::channel(Ok(items.clone()));
        Self {
            items: Arc::new(Mutex::new(items)),
            feed: Arc::new(feed),
            save_should_fail: Arc::new(Mutex::new(false)),
            delete_should_fail: Arc::new(Mutex::new(false)),
            writes_should_panic: Arc::new(Mutex::new(false)),
            observe_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether delete should fail.
    pub fn set_delete_should_fail(&self, should_fail: bool) {
        *self.delete_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether save and delete should panic.
    pub fn set_writes_should_panic(&self, should_panic: bool) {
        *self.writes_should_panic.lock().unwrap() = should_panic;
    }

    /// Replace the collection and notify observers.
    pub fn set_items(&self, items: Vec<Item>) {
        *self.items.lock().unwrap() = items.clone();
        let _previous = self.feed.send_replace(Ok(items));
    }

    /// Make observers see a read fault. The committed items are unchanged.
    pub fn push_read_error(&self, message: impl Into<String>) {
        let _previous = self.feed.send_replace(Err(message.into()));
    }

    /// Current committed items.
    pub fn items(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }

    /// How many times `observe_items` was called.
    pub fn observe_count(&self) -> usize {
        self.observe_count.load(Ordering::SeqCst)
    }

    fn check_panic(&self) {
        if *self.writes_should_panic.lock().unwrap() {
            panic!("Mock store panic");
        }
    }

    fn commit(&self, items: Vec<Item>) {
        *self.items.lock().unwrap() = items.clone();
        let _previous = self.feed.send_replace(Ok(items));
    }
}

impl Default for MockItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MockItemStore {
    fn observe_items(&self) -> BoxStream<'static, Result<Vec<Item>, StoreError>> {
        self.observe_count.fetch_add(1, Ordering::SeqCst);
        watch_stream(self.feed.subscribe())
            .map(|snapshot| snapshot.map_err(StoreError::Read))
            .boxed()
    }

    async fn save_item(&self, item: &Item) -> Result<(), StoreError> {
        self.check_panic();
        if *self.save_should_fail.lock().unwrap() {
            return Err(StoreError::Write("Mock save failure".to_string()));
        }

        let mut items = self.items();
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        self.commit(items);
        Ok(())
    }

    async fn delete_item(&self, id: &str) -> Result<(), StoreError> {
        self.check_panic();
        if *self.delete_should_fail.lock().unwrap() {
            return Err(StoreError::Write("Mock delete failure".to_string()));
        }

        let mut items = self.items();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        self.commit(items);
        Ok(())
    }
}
