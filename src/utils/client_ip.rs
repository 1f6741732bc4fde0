//! Client address resolution.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Resolves the address of the client that issued the request.
///
/// When `behind_proxy` is false the peer socket address is authoritative.
/// Behind a trusted reverse proxy the left-most `X-Forwarded-For` entry is
/// used, then `X-Real-IP`, then the peer address. Unparsable header values
/// fall through to the next source.
///
/// The result is canonicalized, so an IPv4-mapped IPv6 peer
/// (`::ffff:10.0.0.1`) is reported as plain IPv4.
pub fn resolve_client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> IpAddr {
    let from_headers = behind_proxy
        .then(|| {
            forwarded_for(headers).or_else(|| {
                headers
                    .get(X_REAL_IP)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<IpAddr>().ok())
            })
        })
        .flatten();

    from_headers.unwrap_or(peer.ip()).to_canonical()
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}
