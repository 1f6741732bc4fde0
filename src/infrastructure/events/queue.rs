//! Bounded, non-blocking event queue.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::domain::event::EventRecord;

/// Default number of serialized events buffered before drops begin.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Default upper bound for one serialized event, in bytes.
pub const DEFAULT_MAX_EVENT_SIZE: usize = 100 * 1024;

/// Result of handing one event to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Accepted,
    /// Serialized event exceeded the size limit.
    DroppedOversize,
    /// No room left in the queue (or the consumer is gone).
    DroppedQueueFull,
}

/// Snapshot of the queue counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub accepted: u64,
    pub dropped_oversize: u64,
    pub dropped_queue_full: u64,
}

#[derive(Default)]
struct Counters {
    accepted: AtomicU64,
    dropped_oversize: AtomicU64,
    dropped_queue_full: AtomicU64,
}

/// Process-wide outbound queue shared by every request handler.
///
/// Cloning is cheap: clones share the channel and the counters.
/// [`EventQueue::publish`] never waits; when the queue cannot take an event
/// the event is dropped, logged and counted.
#[derive(Clone)]
pub struct EventQueue {
    sender: mpsc::Sender<Vec<u8>>,
    max_event_size: usize,
    counters: Arc<Counters>,
}

impl EventQueue {
    /// Creates the queue and returns the receiving half for the drain worker.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (see [`mpsc::channel`]). Configuration
    /// validation rejects that value before this is reached.
    pub fn new(capacity: usize, max_event_size: usize) -> (Self, mpsc::Receiver<Vec<u8>>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let queue = Self {
            sender,
            max_event_size,
            counters: Arc::new(Counters::default()),
        };
        (queue, receiver)
    }

    /// Serializes and enqueues `event` without blocking.
    pub fn publish(&self, event: &EventRecord) -> PublishOutcome {
        let serialized = event.serialize();

        if serialized.len() > self.max_event_size {
            warn!(
                event_id = %event.id(),
                size = serialized.len(),
                max_size = self.max_event_size,
                "Event too large, dropped"
            );
            metrics::counter!("eventcollector.oversize_dropped").increment(1);
            self.counters
                .dropped_oversize
                .fetch_add(1, Ordering::Relaxed);
            return PublishOutcome::DroppedOversize;
        }

        match self.sender.try_send(serialized) {
            Ok(()) => {
                debug!(event_id = %event.id(), "Event queued");
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                PublishOutcome::Accepted
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(event_id = %event.id(), "Event queue full, dropped");
                self.count_queue_full();
                PublishOutcome::DroppedQueueFull
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(event_id = %event.id(), "Event queue closed, dropped");
                self.count_queue_full();
                PublishOutcome::DroppedQueueFull
            }
        }
    }

    fn count_queue_full(&self) {
        metrics::counter!("eventcollector.queue_full").increment(1);
        self.counters
            .dropped_queue_full
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current counter values.
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            accepted: self.counters.accepted.load(Ordering::Relaxed),
            dropped_oversize: self.counters.dropped_oversize.load(Ordering::Relaxed),
            dropped_queue_full: self.counters.dropped_queue_full.load(Ordering::Relaxed),
        }
    }

    /// Free slots remaining in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    /// Total slots the queue was created with.
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    pub fn max_event_size(&self) -> usize {
        self.max_event_size
    }

    /// Returns true once the drain worker has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_event() -> EventRecord {
        let mut event = EventRecord::new("ad_serving_event", "ad_click");
        event.set_field("url", "https://example.com/ad");
        event
    }

    #[tokio::test]
    async fn test_publish_accepted() {
        let (queue, mut rx) = EventQueue::new(4, DEFAULT_MAX_EVENT_SIZE);
        let event = small_event();

        assert_eq!(queue.publish(&event), PublishOutcome::Accepted);

        let bytes = rx.try_recv().unwrap();
        assert_eq!(bytes, event.serialize());
        assert_eq!(queue.stats().accepted, 1);
    }

    #[tokio::test]
    async fn test_publish_oversize_dropped() {
        let (queue, mut rx) = EventQueue::new(4, 64);
        let mut event = small_event();
        event.set_field("blob", "x".repeat(128));

        assert_eq!(queue.publish(&event), PublishOutcome::DroppedOversize);
        assert!(rx.try_recv().is_err());
        assert_eq!(
            queue.stats(),
            QueueStats {
                accepted: 0,
                dropped_oversize: 1,
                dropped_queue_full: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_publish_queue_full_dropped() {
        let (queue, _rx) = EventQueue::new(1, DEFAULT_MAX_EVENT_SIZE);

        assert_eq!(queue.publish(&small_event()), PublishOutcome::Accepted);
        assert_eq!(queue.publish(&small_event()), PublishOutcome::DroppedQueueFull);
        assert_eq!(queue.publish(&small_event()), PublishOutcome::DroppedQueueFull);

        let stats = queue.stats();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.dropped_queue_full, 2);
        assert_eq!(stats.dropped_oversize, 0);
    }

    #[tokio::test]
    async fn test_publish_after_close_counts_as_full() {
        let (queue, rx) = EventQueue::new(4, DEFAULT_MAX_EVENT_SIZE);
        drop(rx);

        assert!(queue.is_closed());
        assert_eq!(queue.publish(&small_event()), PublishOutcome::DroppedQueueFull);
        assert_eq!(queue.stats().dropped_queue_full, 1);
    }

    #[tokio::test]
    async fn test_clones_share_counters_and_channel() {
        let (queue, mut rx) = EventQueue::new(4, DEFAULT_MAX_EVENT_SIZE);
        let clone = queue.clone();

        clone.publish(&small_event());
        queue.publish(&small_event());

        assert_eq!(queue.stats().accepted, 2);
        assert_eq!(queue.capacity(), 2);
        assert_eq!(queue.max_capacity(), 4);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
    }
}
