//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod click;
pub mod health;

pub use click::click_handler;
pub use health::health_handler;
