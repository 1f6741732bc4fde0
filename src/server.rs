//! HTTP server initialization and runtime setup.
//!
//! Handles event queue setup, worker spawning, and Axum server lifecycle.

use crate::application::services::ClickService;
use crate::config::Config;
use crate::domain::signature::SignatureVerifier;
use crate::infrastructure::events::{EventQueue, EventSink, LogSink, run_event_worker};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Outbound event queue
/// - Background event worker (log sink)
/// - Click service with the shared secret
/// - Axum HTTP server
///
/// On Ctrl-C/SIGTERM the server stops accepting connections and the worker
/// drains what is already queued before the process exits.
///
/// # Errors
///
/// Returns an error if:
/// - The listen address is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (event_queue, event_rx) =
        EventQueue::new(config.event_queue_capacity, config.event_max_size);

    let sink: Arc<dyn EventSink> = Arc::new(LogSink::new());
    let worker = tokio::spawn(run_event_worker(event_rx, sink));
    tracing::info!("Event worker started");

    let verifier = SignatureVerifier::new(config.click_secret.as_bytes());
    let click_service = Arc::new(ClickService::new(verifier, event_queue));

    let state = AppState::new(click_service, config.behind_proxy);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned the last queue senders; the worker ends once drained.
    if let Err(e) = worker.await {
        tracing::error!("Event worker failed: {}", e);
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
