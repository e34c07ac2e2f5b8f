use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use super::view::SharedView;

/// One [`SharedView`] per key, each with its own lifecycle.
///
/// Views are created lazily on first request and reused afterwards, so every
/// caller asking for the same key shares the same producer.
pub struct KeyedViews<K, T> {
    views: Mutex<HashMap<K, SharedView<T>>>,
}

impl<K, T> Default for KeyedViews<K, T> {
    fn default() -> Self {
        Self {
            views: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, T> KeyedViews<K, T>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create<F>(&self, key: &K, create: F) -> SharedView<T>
    where
        F: FnOnce() -> SharedView<T>,
    {
        let mut views = self.views.lock().unwrap_or_else(PoisonError::into_inner);
        views.entry(key.clone()).or_insert_with(create).clone()
    }

    pub fn get(&self, key: &K) -> Option<SharedView<T>> {
        let views = self.views.lock().unwrap_or_else(PoisonError::into_inner);
        views.get(key).cloned()
    }

    /// Drop idle views whose key fails `keep`. A view is idle when its
    /// producer is stopped and nobody is subscribed.
    ///
    /// Returns the number of views removed.
    pub fn prune<F>(&self, keep: F) -> usize
    where
        F: Fn(&K) -> bool,
    {
        let mut views = self.views.lock().unwrap_or_else(PoisonError::into_inner);
        let before = views.len();
        views.retain(|key, view| {
            keep(key) || view.is_running() || view.subscriber_count() > 0
        });
        before - views.len()
    }

    pub fn len(&self) -> usize {
        self.views.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use futures::StreamExt;
    use tokio::runtime::Handle;

    use crate::data_state::DataState;

    fn constant_view(value: u32) -> SharedView<u32> {
        SharedView::new("const", &Handle::current(), Duration::from_secs(5), move || {
            futures::stream::iter(vec![DataState::Loaded(value)]).boxed()
        })
    }

    #[tokio::test]
    async fn test_same_key_returns_same_view() {
        let views: KeyedViews<String, u32> = KeyedViews::new();
        let a = views.get_or_create(&"a".to_string(), || constant_view(1));
        let again = views.get_or_create(&"a".to_string(), || constant_view(99));
        let b = views.get_or_create(&"b".to_string(), || constant_view(2));

        assert_eq!(views.len(), 2);
        assert_eq!(a.name(), again.name());

        let _sub = a.subscribe();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert!(again.is_running());
        assert!(!b.is_running());
        assert!(views.get(&"c".to_string()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_prune_removes_only_idle_views() {
        let views: KeyedViews<String, u32> = KeyedViews::new();
        let busy = views.get_or_create(&"busy".to_string(), || constant_view(1));
        views.get_or_create(&"idle".to_string(), || constant_view(2));
        views.get_or_create(&"kept".to_string(), || constant_view(3));

        let _sub = busy.subscribe();
        tokio::task::yield_now().await;

        assert_eq!(views.prune(|key| key == "kept"), 1);
        assert_eq!(views.len(), 2);
        assert!(views.get(&"idle".to_string()).is_none());
        assert!(views.get(&"busy".to_string()).is_some());
    }
}
