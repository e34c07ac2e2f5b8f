//! Stream sharing and composition.
//!
//! - [`SharedView`] - warm, multicast view with a grace period
//! - [`KeyedViews`] - lazily created views, one per key
//! - [`switch_on_change`] - follow the latest upstream payload with a
//!   dependent stream

mod keyed;
mod switch;
mod view;

pub use keyed::KeyedViews;
pub use switch::switch_on_change;
pub use view::{ProducerFactory, SharedView, ViewSubscription};

use futures::stream::{BoxStream, StreamExt};
use tokio::sync::{mpsc, watch};

/// Stream the current value of `rx`, then every later value it observes.
pub(crate) fn watch_stream<T>(rx: watch::Receiver<T>) -> BoxStream<'static, T>
where
    T: Clone + Send + Sync + 'static,
{
    futures::stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first {
            rx.changed().await.ok()?;
        }
        let value = rx.borrow_and_update().clone();
        Some((value, (rx, false)))
    })
    .boxed()
}

pub(crate) fn receiver_stream<T>(rx: mpsc::UnboundedReceiver<T>) -> BoxStream<'static, T>
where
    T: Send + 'static,
{
    futures::stream::unfold(rx, |mut rx| async move {
        let value = rx.recv().await?;
        Some((value, rx))
    })
    .boxed()
}
