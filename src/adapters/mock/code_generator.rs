//! Scriptable code generator for testing.
//!
//! Every started observation yields a deterministic code right away and then
//! waits for states pushed by the test. Observations are tracked so tests can
//! tell whether a stale generator was actually dropped.

use futures::stream::BoxStream;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::data_state::DataState;
use crate::models::{CodeView, Item};
use crate::shared::receiver_stream;
use crate::traits::CodeGenerator;

type ItemSender = mpsc::UnboundedSender<DataState<CodeView>>;
type ListSender = mpsc::UnboundedSender<DataState<Vec<CodeView>>>;

/// Scriptable code generator for testing.
///
/// The first state of each observation is `Loaded` with the code
/// `code-<key>` and a countdown equal to the item's period.
#[derive(Debug, Clone, Default)]
pub struct MockCodeGenerator {
    /// Open single-item observations, by item id
    item_senders: Arc<Mutex<HashMap<String, Vec<ItemSender>>>>,
    /// Open collection observations
    list_senders: Arc<Mutex<Vec<ListSender>>>,
    /// Every item an observation was started for, in order
    started: Arc<Mutex<Vec<Item>>>,
    /// Every collection an observation was started for, in order
    started_lists: Arc<Mutex<Vec<Vec<Item>>>>,
}

impl MockCodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The code every observation of `item` starts with.
    pub fn code_for(item: &Item) -> CodeView {
        CodeView::for_item(item, format!("code-{}", item.key), item.period)
    }

    /// Push `state` to every open observation of the item with `id`.
    ///
    /// Returns how many observations received it.
    pub fn emit_for(&self, id: &str, state: DataState<CodeView>) -> usize {
        let mut senders = self.item_senders.lock().unwrap();
        let Some(open) = senders.get_mut(id) else {
            return 0;
        };
        open.retain(|tx| !tx.is_closed());
        open.iter()
            .filter(|tx| tx.send(state.clone()).is_ok())
            .count()
    }

    /// Push `state` to every open collection observation.
    pub fn emit_list(&self, state: DataState<Vec<CodeView>>) -> usize {
        let mut senders = self.list_senders.lock().unwrap();
        senders.retain(|tx| !tx.is_closed());
        senders
            .iter()
            .filter(|tx| tx.send(state.clone()).is_ok())
            .count()
    }

    /// Single-item observations whose stream is still alive.
    pub fn active_count(&self) -> usize {
        self.item_senders
            .lock()
            .unwrap()
            .values()
            .flatten()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    /// Collection observations whose stream is still alive.
    pub fn active_list_count(&self) -> usize {
        self.list_senders
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    /// Number of single-item observations started so far.
    pub fn start_count(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    pub fn started_items(&self) -> Vec<Item> {
        self.started.lock().unwrap().clone()
    }

    /// Number of collection observations started so far.
    pub fn list_start_count(&self) -> usize {
        self.started_lists.lock().unwrap().len()
    }

    pub fn started_lists(&self) -> Vec<Vec<Item>> {
        self.started_lists.lock().unwrap().clone()
    }
}

impl CodeGenerator for MockCodeGenerator {
    fn observe(&self, item: &Item) -> BoxStream<'static, DataState<CodeView>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(DataState::Loaded(Self::code_for(item)));

        self.started.lock().unwrap().push(item.clone());
        self.item_senders
            .lock()
            .unwrap()
            .entry(item.id.clone())
            .or_default()
            .push(tx);
        receiver_stream(rx)
    }

    fn observe_items(&self, items: &[Item]) -> BoxStream<'static, DataState<Vec<CodeView>>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let codes = items.iter().map(Self::code_for).collect();
        let _ = tx.send(DataState::Loaded(codes));

        self.started_lists.lock().unwrap().push(items.to_vec());
        self.list_senders.lock().unwrap().push(tx);
        receiver_stream(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_first_state_is_loaded() {
        let generator = MockCodeGenerator::new();
        let item = Item::new_totp("KEY").with_id("1");
        let mut stream = generator.observe(&item);

        let state = stream.next().await.unwrap();
        assert_eq!(state.data().unwrap().code, "code-KEY");
        assert_eq!(generator.start_count(), 1);
        assert_eq!(generator.active_count(), 1);
    }

    #[tokio::test]
    async fn test_emit_and_drop() {
        let generator = MockCodeGenerator::new();
        let item = Item::new_totp("KEY").with_id("1");
        let mut stream = generator.observe(&item);
        stream.next().await.unwrap();

        let failure = DataState::error(StateError::Generation("bad key".to_string()), None);
        assert_eq!(generator.emit_for("1", failure), 1);
        assert!(stream.next().await.unwrap().is_error());

        drop(stream);
        assert_eq!(generator.active_count(), 0);
        assert_eq!(generator.emit_for("1", DataState::Loading), 0);
    }

    #[tokio::test]
    async fn test_observe_items() {
        let generator = MockCodeGenerator::new();
        let items = vec![Item::new_totp("A").with_id("1"), Item::new_totp("B").with_id("2")];
        let mut stream = generator.observe_items(&items);

        let codes = stream.next().await.unwrap().into_data().unwrap();
        let codes: Vec<&str> = codes.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["code-A", "code-B"]);
        assert_eq!(generator.list_start_count(), 1);
        assert_eq!(generator.active_list_count(), 1);
    }
}
