//! Request-derived context attached to click events.

use axum::http::{HeaderMap, header};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::net::IpAddr;

use crate::utils::cookies::parse_cookies;
use crate::utils::extract_domain::extract_domain_from_headers;

/// Cookie holding the logged-in session, `<account id>,<rest…>` percent-encoded.
pub const SESSION_COOKIE: &str = "reddit_session";

/// Cookie holding the anonymous logged-out identifier.
pub const LOID_COOKIE: &str = "loid";

/// Cookie holding the creation time of the logged-out identifier.
pub const LOID_CREATED_COOKIE: &str = "loidcreated";

/// Ambient facts about the request that issued a click.
///
/// Captured once by the HTTP handler and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub host: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub cookies: HashMap<String, String>,
    pub client_ip: Option<IpAddr>,
}

impl RequestContext {
    /// Captures the context from request headers and the resolved client address.
    pub fn from_headers(headers: &HeaderMap, client_ip: Option<IpAddr>) -> Self {
        let header_str = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        Self {
            host: extract_domain_from_headers(headers),
            user_agent: header_str(header::USER_AGENT),
            referrer: header_str(header::REFERER).filter(|r| !r.is_empty()),
            cookies: parse_cookies(headers),
            client_ip,
        }
    }

    /// Returns a cookie value by name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Account id of the logged-in user, parsed from the session cookie.
    ///
    /// Returns `None` when the cookie is missing, its first comma-separated
    /// segment is not an integer, or the id is zero.
    pub fn user_id(&self) -> Option<i64> {
        let session = percent_decode_str(self.cookie(SESSION_COOKIE)?).decode_utf8_lossy();
        session
            .split(',')
            .next()?
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id != 0)
    }
}
