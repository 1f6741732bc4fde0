//! Collector boundary for serialized events.

use async_trait::async_trait;
use std::fmt;
use tracing::info;

/// Errors reported by an [`EventSink`].
#[derive(Debug)]
pub enum SinkError {
    Rejected(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Rejected(e) => write!(f, "Event rejected by sink: {}", e),
        }
    }
}

impl std::error::Error for SinkError {}

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for serialized events drained from the queue.
///
/// Runs off the request path. Implementations must not retry internally;
/// a failed event is logged and counted by the worker, then dropped.
///
/// # Implementations
///
/// - [`LogSink`] - Writes each event as a structured log line
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers one serialized event.
    async fn send(&self, event: &[u8]) -> SinkResult<()>;
}

/// Sink that writes events to the `event_collector` log target.
///
/// Used when no collector transport is configured; a log shipper can pick
/// the events up from there.
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for LogSink {
    async fn send(&self, event: &[u8]) -> SinkResult<()> {
        let event = std::str::from_utf8(event)
            .map_err(|e| SinkError::Rejected(format!("event is not UTF-8: {e}")))?;
        info!(target: "event_collector", event, "event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_sink_accepts_json() {
        let sink = LogSink::new();
        assert!(sink.send(br#"{"event_topic":"t"}"#).await.is_ok());
    }

    #[tokio::test]
    async fn test_log_sink_rejects_invalid_utf8() {
        let sink = LogSink::new();
        let err = sink.send(&[0xff, 0xfe]).await.unwrap_err();
        assert!(matches!(err, SinkError::Rejected(_)));
    }

    #[test]
    fn test_sink_error_display() {
        assert_eq!(
            SinkError::Rejected("too large".to_string()).to_string(),
            "Event rejected by sink: too large"
        );
    }
}
