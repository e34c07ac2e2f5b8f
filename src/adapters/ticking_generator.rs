//! Interval-driven code generator.
//!
//! Recomputes codes once per tick (one second by default), emitting the first
//! value immediately. The code string itself comes from an injected
//! [`CodeSource`]; this adapter only owns the timer and the countdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{BoxStream, StreamExt};
use tokio::time::{interval, MissedTickBehavior};

use crate::data_state::{combine_all, DataState};
use crate::error::StateError;
use crate::models::{CodeView, Item};
use crate::traits::CodeGenerator;

/// Computes the code for an item at a point in time.
pub trait CodeSource: Send + Sync {
    fn generate(&self, item: &Item, at: DateTime<Utc>) -> Result<String, StateError>;
}

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct TickingCodeGenerator {
    source: Arc<dyn CodeSource>,
    tick: Duration,
}

impl TickingCodeGenerator {
    pub fn new(source: Arc<dyn CodeSource>) -> Self {
        Self {
            source,
            tick: DEFAULT_TICK,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    fn ticks<T, F>(&self, compute: F) -> BoxStream<'static, DataState<T>>
    where
        T: Send + 'static,
        F: Fn(DateTime<Utc>) -> DataState<T> + Send + 'static,
    {
        let mut timer = interval(self.tick);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        futures::stream::unfold((timer, compute), |(mut timer, compute)| async move {
            timer.tick().await;
            let state = compute(Utc::now());
            Some((state, (timer, compute)))
        })
        .boxed()
    }
}

/// Seconds left in the current time step at `at`.
pub fn time_left(period: u32, at: DateTime<Utc>) -> u32 {
    let period = i64::from(period.max(1));
    let elapsed = at.timestamp().rem_euclid(period);
    (period - elapsed) as u32
}

fn code_view(source: &dyn CodeSource, item: &Item, at: DateTime<Utc>) -> DataState<CodeView> {
    match source.generate(item, at) {
        Ok(code) => DataState::Loaded(CodeView::for_item(item, code, time_left(item.period, at))),
        Err(error) => DataState::error(error, None),
    }
}

impl CodeGenerator for TickingCodeGenerator {
    fn observe(&self, item: &Item) -> BoxStream<'static, DataState<CodeView>> {
        let source = self.source.clone();
        let item = item.clone();
        self.ticks(move |at| code_view(source.as_ref(), &item, at))
    }

    fn observe_items(&self, items: &[Item]) -> BoxStream<'static, DataState<Vec<CodeView>>> {
        let source = self.source.clone();
        let items = items.to_vec();
        self.ticks(move |at| {
            combine_all(items.iter().map(|item| code_view(source.as_ref(), item, at)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedSource;

    impl CodeSource for FixedSource {
        fn generate(&self, item: &Item, _at: DateTime<Utc>) -> Result<String, StateError> {
            if item.key.is_empty() {
                Err(StateError::Generation("empty secret".to_string()))
            } else {
                Ok(format!("{:0>6}", item.key.len()))
            }
        }
    }

    fn generator() -> TickingCodeGenerator {
        TickingCodeGenerator::new(Arc::new(FixedSource))
    }

    #[test]
    fn test_time_left() {
        let at = Utc.timestamp_opt(1_700_000_010, 0).unwrap();
        // 1_700_000_010 % 30 == 0
        assert_eq!(time_left(30, at), 30);
        let at = Utc.timestamp_opt(1_700_000_035, 0).unwrap();
        assert_eq!(time_left(30, at), 5);
        assert_eq!(time_left(0, at), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_code_is_immediate() {
        let item = Item::new_totp("ABCD").with_id("1").with_issuer("GitHub");
        let mut stream = generator().observe(&item);

        match stream.next().await {
            Some(DataState::Loaded(view)) => {
                assert_eq!(view.code, "000004");
                assert_eq!(view.id, "1");
                assert!((1..=30).contains(&view.time_left_seconds));
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_observe_items_combines_errors() {
        let items = vec![Item::new_totp("ABCD"), Item::new_totp("")];
        let mut stream = generator().observe_items(&items);

        let state = stream.next().await.unwrap();
        assert!(state.is_error());
        assert_eq!(
            state.error_value(),
            Some(&StateError::Generation("empty secret".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_every_tick() {
        let item = Item::new_totp("ABCD");
        let mut stream = generator().with_tick(Duration::from_secs(1)).observe(&item);
        for _ in 0..3 {
            assert!(stream.next().await.unwrap().is_loaded());
        }
    }
}
