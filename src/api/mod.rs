//! HTTP layer for request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
