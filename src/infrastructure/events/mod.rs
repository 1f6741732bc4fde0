//! Outbound event publication.
//!
//! Provides the bounded [`EventQueue`] request handlers publish into, the
//! [`EventSink`] trait for the collector boundary, and the background
//! [`run_event_worker`] that connects the two.

mod queue;
mod sink;
mod worker;

pub use queue::{
    DEFAULT_MAX_EVENT_SIZE, DEFAULT_QUEUE_CAPACITY, EventQueue, PublishOutcome, QueueStats,
};
pub use sink::{EventSink, LogSink, SinkError, SinkResult};
pub use worker::run_event_worker;

#[cfg(test)]
pub use sink::MockEventSink;
