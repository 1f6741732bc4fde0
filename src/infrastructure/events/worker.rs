//! Background worker draining the event queue into a sink.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::sink::EventSink;

/// Forwards every queued event to `sink` until all senders are dropped.
///
/// Delivery is best-effort: a sink error is logged and counted
/// (`eventcollector.sink_error`) and the event is discarded.
pub async fn run_event_worker(mut rx: mpsc::Receiver<Vec<u8>>, sink: Arc<dyn EventSink>) {
    while let Some(event) = rx.recv().await {
        match sink.send(&event).await {
            Ok(()) => metrics::counter!("eventcollector.sent").increment(1),
            Err(e) => {
                warn!("Failed to deliver event: {}", e);
                metrics::counter!("eventcollector.sink_error").increment(1);
            }
        }
    }

    info!("Event queue closed, worker stopping");
}
