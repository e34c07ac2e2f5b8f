//! File-backed item store.
//!
//! Keeps the whole collection in memory, persists it as pretty-printed JSON on
//! every write, and publishes the committed collection to observers only after
//! the file write succeeded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::Item;
use crate::shared::watch_stream;
use crate::traits::ItemStore;

#[derive(Debug)]
pub struct JsonFileItemStore {
    path: PathBuf,
    items: watch::Sender<Vec<Item>>,
    /// Serializes writers so two saves cannot interleave their file writes.
    write_lock: Mutex<()>,
}

impl JsonFileItemStore {
    /// Open the store at `path`, loading existing items if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let items = if tokio::fs::try_exists(&path).await? {
            let json = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str::<Vec<Item>>(&json)?
        } else {
            Vec::new()
        };
        info!("Loaded {} item(s) from {:?}", items.len(), path);

        let (tx, _) = watch::channel(items);
        Ok(Self {
            path,
            items: tx,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn commit(&self, items: Vec<Item>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&items)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, json).await?;
        debug!("Persisted {} item(s) to {:?}", items.len(), self.path);
        self.items.send_replace(items);
        Ok(())
    }
}

#[async_trait]
impl ItemStore for JsonFileItemStore {
    fn observe_items(&self) -> BoxStream<'static, Result<Vec<Item>, StoreError>> {
        watch_stream(self.items.subscribe()).map(Ok).boxed()
    }

    async fn save_item(&self, item: &Item) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.items.borrow().clone();
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        self.commit(items).await
    }

    async fn delete_item(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.items.borrow().clone();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        self.commit(items).await
    }
}
