//! Domain layer: click verification, classification and event construction.
//!
//! Nothing here performs I/O. The pieces are composed by
//! [`crate::application::services::ClickService`].
//!
//! # Modules
//!
//! - [`click`] - Inbound click parameters
//! - [`signature`] - HMAC signature verification with expiry
//! - [`payload`] - Base64url/JSON payload decoding
//! - [`process_notes`] - Audit note and pending error classification
//! - [`request_context`] - Request-derived facts (identity, host, client address)
//! - [`event`] - Event record and collector wire format
//! - [`enricher`] - Construction of `ad_click` events
//!
//! # Click Processing Flow
//!
//! 1. [`signature::SignatureVerifier::verify`] yields a [`signature::SignatureVerdict`]
//! 2. [`payload::decode_payload`] is always attempted
//! 3. [`process_notes::classify`] resolves the note and pending error
//! 4. [`enricher::build_click_event`] produces the [`event::EventRecord`]

pub mod click;
pub mod enricher;
pub mod event;
pub mod payload;
pub mod process_notes;
pub mod request_context;
pub mod signature;
