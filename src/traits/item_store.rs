//! Item store trait abstraction.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::StoreError;
use crate::models::Item;

/// Durable storage for credential items.
///
/// Implementations include the file-backed
/// [`JsonFileItemStore`](crate::adapters::JsonFileItemStore) and
/// [`MockItemStore`](crate::adapters::mock::MockItemStore) for tests.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Live sequence of collection snapshots.
    ///
    /// The stream yields the current collection first and a new snapshot after
    /// every committed change. A read fault is yielded as `Err` without ending
    /// the stream.
    fn observe_items(&self) -> BoxStream<'static, Result<Vec<Item>, StoreError>>;

    /// Insert or replace the item with `item.id`.
    async fn save_item(&self, item: &Item) -> Result<(), StoreError>;

    /// Remove the item with `id`.
    async fn delete_item(&self, id: &str) -> Result<(), StoreError>;
}
