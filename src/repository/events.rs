//! Bounded multicast channel for one-shot events.
//!
//! Emitting never blocks. Events emitted while nobody is listening are kept in
//! a backlog of at most `capacity` entries and handed to the next receiver
//! that subscribes, so a screen opened right after a scan still sees its
//! result. Each backlogged event is handed out once. When a receiver falls
//! more than `capacity` events behind, the oldest events are dropped for it
//! and it resumes at the oldest one still retained.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::config::MAX_EVENT_CAPACITY;

#[derive(Debug)]
pub struct EventChannel<E> {
    tx: broadcast::Sender<E>,
    /// Events emitted with no receiver attached, oldest first.
    backlog: Mutex<VecDeque<E>>,
    capacity: usize,
}

impl<E> EventChannel<E>
where
    E: Clone + Send + 'static,
{
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_EVENT_CAPACITY);
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            backlog: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Publish `event` to every current receiver.
    ///
    /// Returns the number of receivers it was delivered to. With no receivers
    /// the event goes to the backlog instead, dropping the oldest backlogged
    /// event when full, and 0 is returned.
    pub fn emit(&self, event: E) -> usize {
        let mut backlog = self.backlog.lock().unwrap_or_else(PoisonError::into_inner);
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                if backlog.len() == self.capacity {
                    backlog.pop_front();
                    debug!("Event backlog full, dropped oldest event");
                }
                backlog.push_back(event);
                0
            }
        }
    }

    /// Attach a receiver. It first yields any backlogged events, then live
    /// ones.
    pub fn subscribe(&self) -> EventReceiver<E> {
        let mut backlog = self.backlog.lock().unwrap_or_else(PoisonError::into_inner);
        EventReceiver {
            rx: self.tx.subscribe(),
            backlog: std::mem::take(&mut *backlog),
        }
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Events waiting for a receiver.
    pub fn backlog_len(&self) -> usize {
        self.backlog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct EventReceiver<E> {
    rx: broadcast::Receiver<E>,
    backlog: VecDeque<E>,
}

impl<E> EventReceiver<E>
where
    E: Clone + Send + 'static,
{
    /// Wait for the next event. Returns `None` once the channel is closed.
    pub async fn recv(&mut self) -> Option<E> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Event receiver lagged, {} oldest event(s) dropped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next buffered event without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Event receiver lagged, {} oldest event(s) dropped", skipped);
                }
                Err(_) => return None,
            }
        }
    }
}
