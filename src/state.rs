//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::ClickService;
use crate::infrastructure::events::EventQueue;

/// Application state shared across requests.
///
/// Cheap to clone: the service sits behind an `Arc` and the queue handle is
/// itself a shared sender.
#[derive(Clone)]
pub struct AppState {
    pub click_service: Arc<ClickService>,
    pub event_queue: EventQueue,
    /// Read the client address from proxy headers instead of the peer socket.
    pub behind_proxy: bool,
}

impl AppState {
    /// Creates the state from a click service; the queue handle is taken from it.
    pub fn new(click_service: Arc<ClickService>, behind_proxy: bool) -> Self {
        let event_queue = click_service.event_queue().clone();
        Self {
            click_service,
            event_queue,
            behind_proxy,
        }
    }
}
