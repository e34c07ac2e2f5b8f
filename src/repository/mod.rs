//! Repository orchestrating item state, live codes, writes and exports.
//!
//! Read side: a single canonical [`SharedView`] over the store's live
//! observation feeds every derived view (aggregate data, per-item views,
//! per-item and aggregate code views). Derived views only hold the canonical
//! view while they have observers of their own, so the store is read once no
//! matter how many screens are watching.
//!
//! Write side: create/update/delete go straight to the store and report their
//! outcome as a value. A store fault, including a panic inside the store,
//! never escapes these calls.

pub mod events;
pub mod export;

use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt};
use futures::FutureExt;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::config::RepositoryConfig;
use crate::data_state::DataState;
use crate::error::{ErrorCategory, StateError, StoreError};
use crate::models::{
    AuthenticatorData, CodeView, CreateItemResult, DeleteItemResult, ExportDataResult, Item,
    TotpCodeResult, UpdateItemRequest, UpdateItemResult,
};
use crate::shared::{switch_on_change, KeyedViews, SharedView};
use crate::traits::{CodeGenerator, ExportSink, ItemStore};

pub use events::{EventChannel, EventReceiver};
pub use export::ExportFormat;

pub struct Repository {
    store: Arc<dyn ItemStore>,
    generator: Arc<dyn CodeGenerator>,
    sink: Arc<dyn ExportSink>,
    config: RepositoryConfig,
    runtime: Handle,
    items: SharedView<Vec<Item>>,
    data: SharedView<AuthenticatorData>,
    codes: SharedView<Vec<CodeView>>,
    item_views: KeyedViews<String, Option<Item>>,
    code_views: KeyedViews<String, Option<CodeView>>,
    events: EventChannel<TotpCodeResult>,
}

impl Repository {
    /// Build a repository whose views run on `runtime`.
    ///
    /// Nothing is read from the store until a view gets its first observer.
    pub fn new(
        store: Arc<dyn ItemStore>,
        generator: Arc<dyn CodeGenerator>,
        sink: Arc<dyn ExportSink>,
        config: RepositoryConfig,
        runtime: Handle,
    ) -> Self {
        let timeout = config.stop_timeout;

        let items = {
            let store = store.clone();
            SharedView::new("items", &runtime, timeout, move || observe_store(store.clone()))
        };

        let data = {
            let items = items.clone();
            SharedView::new("authenticator_data", &runtime, timeout, move || {
                items
                    .subscribe()
                    .into_stream()
                    .map(|state| state.map(AuthenticatorData::new))
                    .boxed()
            })
        };

        let codes = {
            let data = data.clone();
            let generator = generator.clone();
            SharedView::new("codes", &runtime, timeout, move || {
                let generator = generator.clone();
                let upstream = data
                    .subscribe()
                    .into_stream()
                    .map(|state| state.map(|data| data.items))
                    .boxed();
                switch_on_change(upstream, Vec::new(), move |items: &Vec<Item>| {
                    Some(generator.observe_items(items))
                })
            })
        };

        Self {
            store,
            generator,
            sink,
            events: EventChannel::new(config.event_capacity),
            config,
            runtime,
            items,
            data,
            codes,
            item_views: KeyedViews::new(),
            code_views: KeyedViews::new(),
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// The canonical item collection.
    pub fn items_state(&self) -> SharedView<Vec<Item>> {
        self.items.clone()
    }

    /// The canonical collection wrapped as [`AuthenticatorData`].
    pub fn authenticator_data(&self) -> SharedView<AuthenticatorData> {
        self.data.clone()
    }

    /// The item with `id`, or `None` while it is absent from the collection.
    pub fn item_state(&self, id: &str) -> SharedView<Option<Item>> {
        self.prune_views();
        self.item_views.get_or_create(&id.to_string(), || {
            let items = self.items.clone();
            let id = id.to_string();
            SharedView::new(
                format!("item:{id}"),
                &self.runtime,
                self.config.stop_timeout,
                move || {
                    let id = id.clone();
                    items
                        .subscribe()
                        .into_stream()
                        .map(move |state| {
                            state.map(|list| list.into_iter().find(|item| item.id == id))
                        })
                        .boxed()
                },
            )
        })
    }

    /// Live code for the item with `id`.
    ///
    /// Whenever the item is edited, removed or (re)appears, the running code
    /// generator is dropped and a new one is started for the new value. The
    /// item's own status is folded into the result, so a store error shows up
    /// here even while codes keep ticking.
    pub fn code_state(&self, id: &str) -> SharedView<Option<CodeView>> {
        let item_view = self.item_state(id);
        self.code_views.get_or_create(&id.to_string(), || {
            let generator = self.generator.clone();
            SharedView::new(
                format!("code:{id}"),
                &self.runtime,
                self.config.stop_timeout,
                move || {
                    let generator = generator.clone();
                    switch_on_change(
                        item_view.subscribe().into_stream(),
                        None,
                        move |item: &Option<Item>| {
                            item.as_ref()
                                .map(|item| generator.observe(item).map(|state| state.map(Some)).boxed())
                        },
                    )
                },
            )
        })
    }

    /// Number of cached per-item views.
    pub fn item_view_count(&self) -> usize {
        self.item_views.len()
    }

    /// Number of cached per-item code views.
    pub fn code_view_count(&self) -> usize {
        self.code_views.len()
    }

    /// Evict idle per-id views whose item is gone from the loaded collection.
    /// Nothing is evicted while the collection is not loaded.
    fn prune_views(&self) {
        let current = self.items.current();
        let Some(items) = current.data() else {
            return;
        };
        let ids: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        let removed = self.code_views.prune(|id| ids.contains(id.as_str()))
            + self.item_views.prune(|id| ids.contains(id.as_str()));
        if removed > 0 {
            debug!(removed, "Evicted idle views of absent items");
        }
    }

    /// Live codes for the whole collection. Any change to the collection
    /// restarts the generators for all items.
    pub fn code_states(&self) -> SharedView<Vec<CodeView>> {
        self.codes.clone()
    }

    /// Publish a one-shot event. Never blocks; see [`EventChannel`].
    pub fn emit_event(&self, event: TotpCodeResult) {
        let receivers = self.events.emit(event);
        debug!("Emitted code event to {} receiver(s)", receivers);
    }

    pub fn events(&self) -> EventReceiver<TotpCodeResult> {
        self.events.subscribe()
    }

    pub async fn create_item(&self, item: Item) -> CreateItemResult {
        match guarded_write("create_item", self.store.save_item(&item)).await {
            Ok(()) => {
                info!(item_id = %item.id, "Item created");
                CreateItemResult::Success
            }
            Err(detail) => CreateItemResult::Error(Some(detail)),
        }
    }

    /// Replace the item with `id` by the values in `request`.
    ///
    /// The owning `user_id` is carried over from a point-in-time snapshot of
    /// the store taken just before the write. A failed snapshot read fails the
    /// update.
    pub async fn update_item(&self, id: &str, request: UpdateItemRequest) -> UpdateItemResult {
        let write = async {
            let user_id = self
                .snapshot_items()
                .await?
                .into_iter()
                .find(|item| item.id == id)
                .and_then(|item| item.user_id);
            let item = request.into_item(id, user_id);
            self.store.save_item(&item).await
        };

        match guarded_write("update_item", write).await {
            Ok(()) => {
                info!(item_id = %id, "Item updated");
                UpdateItemResult::Success
            }
            Err(detail) => UpdateItemResult::Error(Some(detail)),
        }
    }

    pub async fn delete_item(&self, id: &str) -> DeleteItemResult {
        match guarded_write("delete_item", self.store.delete_item(id)).await {
            Ok(()) => {
                info!(item_id = %id, "Item deleted");
                DeleteItemResult::Success
            }
            Err(detail) => DeleteItemResult::Error(Some(detail)),
        }
    }

    /// Export a point-in-time snapshot of the collection.
    ///
    /// Succeeds only if the snapshot is read, encoded, and accepted by the
    /// sink. Nothing is retried.
    pub async fn export_data(&self, format: ExportFormat, destination: &Path) -> ExportDataResult {
        let items = match self.snapshot_items().await {
            Ok(items) => items,
            Err(e) => {
                warn!(category = %e.category(), "Export aborted, could not read items: {}", e);
                return ExportDataResult::Error;
            }
        };

        let data = match export::encode(format, &items) {
            Ok(data) => data,
            Err(e) => {
                warn!(category = %e.category(), "Export aborted, encoding failed: {}", e);
                return ExportDataResult::Error;
            }
        };

        if self.sink.write(destination, &data).await {
            info!(
                "Exported {} item(s) as {} to {}",
                items.len(),
                format.file_extension(),
                destination.display()
            );
            ExportDataResult::Success
        } else {
            warn!("Export sink rejected write to {}", destination.display());
            ExportDataResult::Error
        }
    }

    async fn snapshot_items(&self) -> Result<Vec<Item>, StoreError> {
        match self.store.observe_items().next().await {
            Some(snapshot) => snapshot,
            None => Ok(Vec::new()),
        }
    }
}

/// Canonical item stream: `Loading` on start, then one state per snapshot.
/// Read faults keep the last good snapshot as payload.
fn observe_store(store: Arc<dyn ItemStore>) -> BoxStream<'static, DataState<Vec<Item>>> {
    let snapshots = store
        .observe_items()
        .scan(None::<Vec<Item>>, |last, snapshot| {
            let state = match snapshot {
                Ok(items) => {
                    *last = Some(items.clone());
                    DataState::Loaded(items)
                }
                Err(e) => {
                    warn!(
                        category = %e.category(),
                        retryable = e.category().is_retryable(),
                        "Item store read failed: {}",
                        e
                    );
                    DataState::error(StateError::from(&e), last.clone())
                }
            };
            futures::future::ready(Some(state))
        });

    futures::stream::once(futures::future::ready(DataState::Loading))
        .chain(snapshots)
        .boxed()
}

/// Run a store write, turning errors and panics into a message prefixed with
/// the error category description.
async fn guarded_write<F>(operation: &'static str, write: F) -> Result<(), String>
where
    F: Future<Output = Result<(), StoreError>>,
{
    match AssertUnwindSafe(write).catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            let category = e.category();
            warn!(
                operation,
                category = %category,
                retryable = category.is_retryable(),
                "Store write failed: {}",
                e
            );
            Err(format!("{}: {}", category.description(), e))
        }
        Err(_) => {
            let category = ErrorCategory::Storage;
            error!(operation, category = %category, "Store write panicked");
            Err(format!("{}: item store panicked during write", category.description()))
        }
    }
}
