//! Code generator trait abstraction.

use futures::stream::BoxStream;

use crate::data_state::DataState;
use crate::models::{CodeView, Item};

/// Turns items into live, periodically recomputed codes.
///
/// Both streams must emit immediately when polled for the first time and at
/// least once per time step afterwards. Dropping a stream stops its timer.
pub trait CodeGenerator: Send + Sync {
    fn observe(&self, item: &Item) -> BoxStream<'static, DataState<CodeView>>;

    fn observe_items(&self, items: &[Item]) -> BoxStream<'static, DataState<Vec<CodeView>>>;
}
