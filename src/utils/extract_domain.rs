//! Domain extraction from request headers and URLs.

use axum::http::{HeaderMap, header};
use url::Url;

/// Extracts the domain name from the `Host` header.
///
/// Handles:
/// - IPv4 addresses (e.g., `192.168.1.1`)
/// - IPv6 addresses (e.g., `[::1]`)
/// - Hostnames with ports (e.g., `example.com:3000`)
/// - Plain hostnames (e.g., `example.com`)
///
/// Port numbers are stripped from the result. Returns `None` when the header
/// is missing or not valid UTF-8; a click is still tracked without it.
pub fn extract_domain_from_headers(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?;

    let domain = if host.starts_with('[') {
        // IPv6 address (e.g., [::1] or [::1]:8080)
        if let Some(end_bracket) = host.find(']') {
            host[..=end_bracket].to_string()
        } else {
            host.to_string()
        }
    } else {
        host.split(':').next().unwrap_or(host).to_string()
    };

    Some(domain)
}

/// Returns the host portion of an absolute URL, or an empty string when the
/// URL cannot be parsed or has no host.
pub fn extract_domain_from_url(input: &str) -> String {
    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    fn headers_with_host(host: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static(host));
        headers
    }

    #[test]
    fn test_extract_domain_simple() {
        let headers = headers_with_host("example.com");
        assert_eq!(
            extract_domain_from_headers(&headers),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_domain_with_port() {
        let headers = headers_with_host("example.com:3000");
        assert_eq!(
            extract_domain_from_headers(&headers),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_domain_ip_with_port() {
        let headers = headers_with_host("192.168.1.1:9000");
        assert_eq!(
            extract_domain_from_headers(&headers),
            Some("192.168.1.1".to_string())
        );
    }

    #[test]
    fn test_extract_domain_ipv6_with_port() {
        let headers = headers_with_host("[::1]:8080");
        assert_eq!(
            extract_domain_from_headers(&headers),
            Some("[::1]".to_string())
        );
    }

    #[test]
    fn test_extract_domain_missing_host_header() {
        assert_eq!(extract_domain_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_extract_domain_invalid_utf8() {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(&[0xFF, 0xFE, 0xFD]) {
            headers.insert(header::HOST, value);
            assert_eq!(extract_domain_from_headers(&headers), None);
        }
    }

    #[test]
    fn test_extract_domain_from_url() {
        assert_eq!(
            extract_domain_from_url("https://www.reddit.com/r/rust/"),
            "www.reddit.com"
        );
        assert_eq!(
            extract_domain_from_url("http://news.example.com:8080/a?b=c"),
            "news.example.com"
        );
    }

    #[test]
    fn test_extract_domain_from_bad_url() {
        assert_eq!(extract_domain_from_url("not a url"), "");
        assert_eq!(extract_domain_from_url("mailto:someone@example.com"), "");
    }
}
