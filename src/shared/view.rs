//! Warm, multicast view over a cold producer.
//!
//! A [`SharedView`] starts its producer when the first observer attaches,
//! replays the current value to every later observer, and keeps the producer
//! alive for a grace period after the last observer leaves so that a quick
//! re-subscription (a screen transition, say) does not restart it.
//!
//! The producer lifecycle is owned by a single actor task. Observers only talk
//! to it through attach/detach commands; the current value lives in a `watch`
//! channel that is written under a generation guard, so a producer that has
//! been stopped can never overwrite the value of its successor.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::stream::{BoxStream, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::data_state::DataState;

/// Creates a fresh producer stream each time the view (re)starts.
pub type ProducerFactory<T> = Arc<dyn Fn() -> BoxStream<'static, DataState<T>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Attach,
    Detach,
}

/// Current-value cache plus the generation of the producer allowed to write it.
struct Publisher<T> {
    generation: Mutex<u64>,
    tx: watch::Sender<DataState<T>>,
}

impl<T> Publisher<T> {
    fn publish(&self, generation: u64, value: DataState<T>) -> bool {
        let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            return false;
        }
        self.tx.send_replace(value);
        true
    }

    /// Invalidate whichever producer currently holds the write slot.
    fn advance(&self, reset: Option<DataState<T>>) -> u64 {
        let mut current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *current += 1;
        if let Some(value) = reset {
            self.tx.send_replace(value);
        }
        *current
    }
}

#[derive(Debug, Default)]
struct ViewStats {
    subscribers: AtomicUsize,
    running: AtomicBool,
    starts: AtomicUsize,
}

pub struct SharedView<T> {
    name: Arc<str>,
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<DataState<T>>,
    stats: Arc<ViewStats>,
}

impl<T> Clone for SharedView<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            commands: self.commands.clone(),
            state: self.state.clone(),
            stats: self.stats.clone(),
        }
    }
}

impl<T> fmt::Debug for SharedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedView")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .field("running", &self.is_running())
            .finish()
    }
}

impl<T> SharedView<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a view whose actor runs on `runtime`.
    ///
    /// The producer is not started until the first [`subscribe`](Self::subscribe).
    pub fn new<F>(
        name: impl Into<String>,
        runtime: &Handle,
        stop_timeout: Duration,
        producer: F,
    ) -> Self
    where
        F: Fn() -> BoxStream<'static, DataState<T>> + Send + Sync + 'static,
    {
        let name: Arc<str> = Arc::from(name.into());
        let (tx, state) = watch::channel(DataState::Loading);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let stats = Arc::new(ViewStats::default());

        let actor = ViewActor {
            name: name.clone(),
            producer: Arc::new(producer),
            publisher: Arc::new(Publisher {
                generation: Mutex::new(0),
                tx,
            }),
            stats: stats.clone(),
            stop_timeout,
            runtime: runtime.clone(),
            commands: command_rx,
            attached: 0,
            running: None,
            stop_at: None,
        };
        runtime.spawn(actor.run());

        Self {
            name,
            commands,
            state,
            stats,
        }
    }

    /// Attach a new observer. The first value it yields is the view's current
    /// value.
    pub fn subscribe(&self) -> ViewSubscription<T> {
        self.stats.subscribers.fetch_add(1, Ordering::SeqCst);
        let _ = self.commands.send(Command::Attach);
        ViewSubscription {
            rx: self.state.clone(),
            primed: false,
            commands: self.commands.clone(),
            stats: self.stats.clone(),
        }
    }

    /// Last value published by the producer, `Loading` when stopped.
    pub fn current(&self) -> DataState<T> {
        self.state.borrow().clone()
    }
}

impl<T> SharedView<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscriber_count(&self) -> usize {
        self.stats.subscribers.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.stats.running.load(Ordering::SeqCst)
    }

    /// How many times the producer has been started.
    pub fn start_count(&self) -> usize {
        self.stats.starts.load(Ordering::SeqCst)
    }
}

/// An attached observer. Dropping it detaches from the view.
pub struct ViewSubscription<T> {
    rx: watch::Receiver<DataState<T>>,
    primed: bool,
    commands: mpsc::UnboundedSender<Command>,
    stats: Arc<ViewStats>,
}

impl<T> ViewSubscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Wait for the next value.
    ///
    /// Returns the current value on the first call. Afterwards only the latest
    /// value is returned; intermediate values a slow observer missed are
    /// skipped.
    pub async fn next(&mut self) -> Option<DataState<T>> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn current(&self) -> DataState<T> {
        self.rx.borrow().clone()
    }

    /// Turn the subscription into a stream. The observer stays attached until
    /// the stream is dropped.
    pub fn into_stream(self) -> BoxStream<'static, DataState<T>> {
        futures::stream::unfold(self, |mut subscription| async move {
            let value = subscription.next().await?;
            Some((value, subscription))
        })
        .boxed()
    }
}

impl<T> Drop for ViewSubscription<T> {
    fn drop(&mut self) {
        self.stats.subscribers.fetch_sub(1, Ordering::SeqCst);
        let _ = self.commands.send(Command::Detach);
    }
}

struct ViewActor<T> {
    name: Arc<str>,
    producer: ProducerFactory<T>,
    publisher: Arc<Publisher<T>>,
    stats: Arc<ViewStats>,
    stop_timeout: Duration,
    runtime: Handle,
    commands: mpsc::UnboundedReceiver<Command>,
    attached: usize,
    running: Option<JoinHandle<()>>,
    stop_at: Option<Instant>,
}

impl<T> ViewActor<T>
where
    T: Send + Sync + 'static,
{
    async fn run(mut self) {
        loop {
            let stop_at = self.stop_at;
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Attach) => self.attach(),
                    Some(Command::Detach) => self.detach(),
                    None => break,
                },
                _ = tokio::time::sleep_until(stop_at.unwrap_or_else(Instant::now)), if stop_at.is_some() => {
                    self.stop_at = None;
                    debug!(view = %self.name, "grace period elapsed, stopping producer");
                    self.stop();
                }
            }
        }
        self.stop();
        trace!(view = %self.name, "shared view dropped");
    }

    fn attach(&mut self) {
        self.attached += 1;
        if self.stop_at.take().is_some() {
            debug!(view = %self.name, "observer re-attached within grace period");
        }
        if self.running.is_none() {
            self.start();
        }
    }

    fn detach(&mut self) {
        self.attached = self.attached.saturating_sub(1);
        if self.attached == 0 && self.running.is_some() {
            self.stop_at = Some(Instant::now() + self.stop_timeout);
        }
    }

    fn start(&mut self) {
        let generation = self.publisher.advance(None);
        let mut stream = (self.producer)();
        let publisher = self.publisher.clone();
        let name = self.name.clone();

        self.stats.running.store(true, Ordering::SeqCst);
        self.stats.starts.fetch_add(1, Ordering::SeqCst);
        debug!(view = %self.name, generation, "starting producer");

        self.running = Some(self.runtime.spawn(async move {
            while let Some(value) = stream.next().await {
                trace!(view = %name, state = value.label(), "publishing");
                if !publisher.publish(generation, value) {
                    break;
                }
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(handle) = self.running.take() {
            self.publisher.advance(Some(DataState::Loading));
            handle.abort();
            self.stats.running.store(false, Ordering::SeqCst);
            debug!(view = %self.name, "producer stopped");
        }
    }
}
