//! Switch-on-change composition.
//!
//! Follows an upstream `DataState<U>` and keeps exactly one dependent stream
//! alive for the current upstream payload. When the payload changes, the
//! dependent stream is dropped before its replacement is created, so nothing
//! it computed can reach the output afterwards. Status-only upstream changes
//! (same payload, different variant) are folded into the output without
//! restarting the dependent stream.

use futures::stream::{BoxStream, StreamExt};
use tracing::debug;

use crate::data_state::{combine, DataState};

struct Switch<U, C, F> {
    upstream: BoxStream<'static, DataState<U>>,
    upstream_done: bool,
    inner: Option<BoxStream<'static, DataState<C>>>,
    key: Option<U>,
    status: DataState<U>,
    latest: Option<DataState<C>>,
    generation: u64,
    empty: C,
    start: F,
}

enum Next<U, C> {
    Upstream(Option<DataState<U>>),
    Inner(Option<DataState<C>>),
}

/// Compose `upstream` with the dependent stream produced by `start`.
///
/// - `start` is called with the upstream payload each time it changes. It may
///   return `None` when there is nothing to follow (e.g. an absent item).
/// - While no dependent stream is active the output is the upstream status
///   with `empty` as payload.
/// - While one is active, each output is
///   `combine(dependent, upstream, |value, _| value)`: the upstream only
///   contributes to the status.
pub fn switch_on_change<U, C, F>(
    upstream: BoxStream<'static, DataState<U>>,
    empty: C,
    start: F,
) -> BoxStream<'static, DataState<C>>
where
    U: Clone + PartialEq + Send + 'static,
    C: Clone + Send + 'static,
    F: Fn(&U) -> Option<BoxStream<'static, DataState<C>>> + Send + 'static,
{
    let state = Switch {
        upstream,
        upstream_done: false,
        inner: None,
        key: None,
        status: DataState::Loading,
        latest: None,
        generation: 0,
        empty,
        start,
    };

    futures::stream::unfold(state, |mut s| async move {
        loop {
            let next = match s.inner.as_mut() {
                Some(inner) if !s.upstream_done => {
                    tokio::select! {
                        biased;
                        value = s.upstream.next() => Next::Upstream(value),
                        value = inner.next() => Next::Inner(value),
                    }
                }
                Some(inner) => Next::Inner(inner.next().await),
                None if !s.upstream_done => Next::Upstream(s.upstream.next().await),
                None => return None,
            };

            match next {
                Next::Upstream(None) => s.upstream_done = true,
                Next::Upstream(Some(state)) => {
                    let key = state.data().cloned();
                    if key != s.key {
                        // Drop the stale dependent before creating its successor.
                        s.inner = None;
                        s.latest = None;
                        s.generation += 1;
                        s.inner = key.as_ref().and_then(|k| (s.start)(k));
                        debug!(
                            generation = s.generation,
                            active = s.inner.is_some(),
                            "upstream changed, switched dependent stream"
                        );
                        s.key = key;
                    }
                    s.status = state.clone();

                    if s.inner.is_none() {
                        let empty = s.empty.clone();
                        return Some((state.map(|_| empty), s));
                    }
                    if let Some(latest) = s.latest.clone() {
                        return Some((combine(latest, state, |value, _| value), s));
                    }
                }
                Next::Inner(Some(value)) => {
                    s.latest = Some(value.clone());
                    let out = combine(value, s.status.clone(), |value, _| value);
                    return Some((out, s));
                }
                Next::Inner(None) => s.inner = None,
            }
        }
    })
    .boxed()
}
