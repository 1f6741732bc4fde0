//! Application layer services.
//!
//! Services coordinate domain operations (signature checks, payload decoding,
//! event construction) and the outbound event queue, and expose a small API to
//! HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::click_service::ClickService`] - Signed click tracking

pub mod services;
