//! `Cookie` header parsing.

use axum::http::{HeaderMap, header::COOKIE};
use std::collections::HashMap;

/// Collects every `name=value` pair from all `Cookie` headers.
///
/// Values are returned as sent (no percent-decoding). When a name repeats,
/// the first occurrence wins, matching how browsers order more specific
/// cookies first. Fragments without `=` are ignored.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    for cookie_str in headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
    {
        for cookie in cookie_str.split(';') {
            let mut parts = cookie.trim().splitn(2, '=');
            if let (Some(name), Some(value)) = (parts.next(), parts.next())
                && !name.is_empty()
            {
                cookies
                    .entry(name.to_string())
                    .or_insert_with(|| value.trim_matches('"').to_string());
            }
        }
    }

    cookies
}
