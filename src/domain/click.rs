//! Inbound click parameters.

use serde::Deserialize;

/// Query parameters of `GET /click`.
///
/// All three are required; they are optional here so that a missing value
/// produces the service's own `400` rather than an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClickParams {
    /// Destination URL, percent-decoded by the query extractor.
    pub url: Option<String>,
    /// Base64url-encoded JSON payload.
    pub data: Option<String>,
    /// Signature over `url|data`.
    pub hmac: Option<String>,
}

impl ClickParams {
    /// Returns `(url, data, hmac)` when all three are present and non-empty.
    pub fn required(&self) -> Option<(&str, &str, &str)> {
        fn non_empty(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|s| !s.is_empty())
        }

        Some((
            non_empty(&self.url)?,
            non_empty(&self.data)?,
            non_empty(&self.hmac)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(url: Option<&str>, data: Option<&str>, hmac: Option<&str>) -> ClickParams {
        ClickParams {
            url: url.map(str::to_owned),
            data: data.map(str::to_owned),
            hmac: hmac.map(str::to_owned),
        }
    }

    #[test]
    fn test_all_present() {
        let p = params(Some("https://example.com"), Some("e30"), Some("sig"));
        assert_eq!(p.required(), Some(("https://example.com", "e30", "sig")));
    }

    #[test]
    fn test_any_missing() {
        assert!(params(None, Some("e30"), Some("sig")).required().is_none());
        assert!(params(Some("u"), None, Some("sig")).required().is_none());
        assert!(params(Some("u"), Some("e30"), None).required().is_none());
    }

    #[test]
    fn test_any_empty() {
        assert!(params(Some(""), Some("e30"), Some("sig")).required().is_none());
        assert!(params(Some("u"), Some(""), Some("sig")).required().is_none());
        assert!(params(Some("u"), Some("e30"), Some("")).required().is_none());
    }
}
