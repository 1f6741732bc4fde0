//! Utility functions for request parsing and URL handling.
//!
//! This module provides helper functions used across the application:
//!
//! - [`base64url`] - Lenient URL-safe base64 decoding
//! - [`client_ip`] - Client address resolution (peer socket or proxy headers)
//! - [`cookies`] - `Cookie` header parsing
//! - [`extract_domain`] - Domain extraction from HTTP headers and URLs
//! - [`url_normalizer`] - Query string re-encoding for redirect targets
//! - [`useragent`] - Lightweight User-Agent classification

pub mod base64url;
pub mod client_ip;
pub mod cookies;
pub mod extract_domain;
pub mod url_normalizer;
pub mod useragent;
