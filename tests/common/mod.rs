#![allow(dead_code)]

use ads_tracking::api::handlers::{click_handler, health_handler};
use ads_tracking::application::services::ClickService;
use ads_tracking::domain::signature::{SIGNATURE_VERSION, SignatureVerifier, canonical_message};
use ads_tracking::infrastructure::events::{DEFAULT_MAX_EVENT_SIZE, EventQueue};
use ads_tracking::state::AppState;
use axum::{Router, extract::ConnectInfo, routing::get};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const TEST_SECRET: &str = "integration-click-secret";

pub const PEER_ADDR: &str = "127.0.0.1:12345";

pub fn create_test_state(behind_proxy: bool) -> (AppState, mpsc::Receiver<Vec<u8>>) {
    create_test_state_with_queue(100, DEFAULT_MAX_EVENT_SIZE, behind_proxy)
}

pub fn create_test_state_with_queue(
    capacity: usize,
    max_event_size: usize,
    behind_proxy: bool,
) -> (AppState, mpsc::Receiver<Vec<u8>>) {
    let (queue, rx) = EventQueue::new(capacity, max_event_size);
    let service = ClickService::new(SignatureVerifier::new(TEST_SECRET), queue);
    (AppState::new(Arc::new(service), behind_proxy), rx)
}

pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/click", get(click_handler))
        .route("/health", get(health_handler))
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

/// Encodes a JSON payload the way link generators do.
pub fn encode_data(json: &str) -> String {
    URL_SAFE.encode(json)
}

/// Signs `url|data` with `secret`, valid until `expiration` (unix seconds).
pub fn sign(secret: &str, url: &str, data: &str, expiration: i64) -> String {
    let mut header = vec![SIGNATURE_VERSION, 0, 0];
    header.extend_from_slice(&(expiration as u32).to_le_bytes());

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(&header);
    mac.update(&canonical_message(url, data));

    let mut raw = header;
    raw.extend_from_slice(&mac.finalize().into_bytes());
    URL_SAFE.encode(raw)
}

pub fn in_one_hour() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

pub fn one_hour_ago() -> i64 {
    chrono::Utc::now().timestamp() - 3600
}

/// Receives the single event published for a request.
pub fn single_event(rx: &mut mpsc::Receiver<Vec<u8>>) -> Value {
    let bytes = rx.try_recv().expect("an event should have been published");
    assert!(rx.try_recv().is_err(), "only one event should be published");
    serde_json::from_slice(&bytes).unwrap()
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
