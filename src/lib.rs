//! # Ads Tracking
//!
//! Click-tracking redirect service built with Axum. Every signed ad link
//! passes through `GET /click`, which checks the link signature, decodes the
//! attached attribution payload, records one `ad_click` event for the
//! analytics pipeline and redirects the browser to the advertiser.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Signatures, payloads, event records, classification
//! - **Application Layer** ([`application`]) - Click tracking orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - Outbound event queue and sinks
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Outcomes
//!
//! | signature            | payload | response       | `process_notes`     |
//! |----------------------|---------|----------------|---------------------|
//! | valid                | ok      | 302 redirect   | `VALID`             |
//! | expired              | ok      | 302 redirect   | `EXPIRED_SIGNATURE` |
//! | unreadable/incorrect | ok      | 403 Forbidden  | `INVALID_SIGNATURE` |
//! | any                  | bad     | 400 Bad Request| `BAD_DATA`          |
//!
//! ## Quick Start
//!
//! ```bash
//! export CLICK_SECRET="shared-secret"
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::ClickService;
    pub use crate::domain::click::ClickParams;
    pub use crate::domain::event::EventRecord;
    pub use crate::domain::request_context::RequestContext;
    pub use crate::domain::signature::{SignatureVerdict, SignatureVerifier};
    pub use crate::error::AppError;
    pub use crate::infrastructure::events::{EventQueue, PublishOutcome};
    pub use crate::state::AppState;
}
