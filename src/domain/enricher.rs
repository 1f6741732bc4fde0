//! Construction of `ad_click` events.
//!
//! Fields are written in a fixed order so that explicit values always win
//! over inferred ones:
//!
//! 1. Request context (plain)
//! 2. Request context (obfuscated)
//! 3. `url`, `process_notes`, `expired_on`
//! 4. Payload fields, which may replace any of the above
//!
//! Consumers that need the validation outcome independently of the payload
//! must rely on the HTTP response, not on the event.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::net::IpAddr;

use crate::domain::event::EventRecord;
use crate::domain::payload::PayloadFields;
use crate::domain::process_notes::ProcessNote;
use crate::domain::request_context::{LOID_COOKIE, LOID_CREATED_COOKIE, RequestContext};
use crate::utils::extract_domain::extract_domain_from_url;
use crate::utils::useragent;

/// Stream the click events are filed under.
pub const CLICK_TOPIC: &str = "ad_serving_event";

/// Event type of a click, before namespacing.
pub const CLICK_EVENT_TYPE: &str = "ad_click";

/// Outcome-specific facts about a click.
#[derive(Debug, Clone)]
pub struct ClickDetails {
    /// Normalized redirect target.
    pub destination: String,
    pub note: ProcessNote,
    /// Expiration of an authentic but expired signature.
    pub expired_on: Option<DateTime<Utc>>,
    pub payload: PayloadFields,
}

/// Builds the `ad_click` event for one request.
pub fn build_click_event(ctx: &RequestContext, details: ClickDetails) -> EventRecord {
    let mut event = EventRecord::new(CLICK_TOPIC, CLICK_EVENT_TYPE);

    for (key, value) in request_fields(ctx) {
        event.set_field(key, value);
    }
    for (key, value) in sensitive_request_fields(ctx) {
        event.set_obfuscated_field(key, value);
    }

    event.set_field("url", details.destination);
    event.set_field("process_notes", details.note.as_str());
    if let Some(expired_on) = details.expired_on {
        event.set_field("expired_on", expired_on.timestamp());
    }

    for (key, value) in details.payload {
        event.set_field(key, value);
    }

    event
}

/// Plain context fields: identity, host, user agent, referrer.
///
/// Exactly one identity scheme is emitted: `user_id` for a logged-in
/// session, otherwise `loid` and `loid_created` (null when the cookies are
/// absent).
pub fn request_fields(ctx: &RequestContext) -> Vec<(&'static str, Value)> {
    let mut fields = Vec::with_capacity(8);

    match ctx.user_id() {
        Some(user_id) => fields.push(("user_id", Value::from(user_id))),
        None => {
            fields.push(("loid", optional_string(ctx.cookie(LOID_COOKIE))));
            fields.push((
                "loid_created",
                optional_string(ctx.cookie(LOID_CREATED_COOKIE)),
            ));
        }
    }

    fields.push(("domain", optional_string(ctx.host.as_deref())));
    fields.push(("user_agent", optional_string(ctx.user_agent.as_deref())));

    let parsed = ctx
        .user_agent
        .as_deref()
        .map(useragent::parse)
        .and_then(|ua| serde_json::to_value(ua).ok())
        .unwrap_or(Value::Null);
    fields.push(("user_agent_parsed", parsed));

    if let Some(referrer) = ctx.referrer.as_deref() {
        fields.push(("referrer_url", Value::from(referrer)));
        fields.push(("referrer_domain", Value::from(extract_domain_from_url(referrer))));
    }

    fields
}

/// Context fields the collector must obfuscate.
///
/// The downstream obfuscation is irreversible, so the /24 and /16 prefixes of
/// an IPv4 address are precomputed here; each is obfuscated separately.
pub fn sensitive_request_fields(ctx: &RequestContext) -> Vec<(&'static str, Value)> {
    let Some(ip) = ctx.client_ip else {
        return Vec::new();
    };

    let mut fields = vec![("client_ip", Value::from(ip.to_string()))];

    if let IpAddr::V4(v4) = ip {
        let [a, b, c, _] = v4.octets();
        fields.push(("client_ipv4_24", Value::from(format!("{a}.{b}.{c}"))));
        fields.push(("client_ivp4_16", Value::from(format!("{a}.{b}"))));
    }

    fields
}

fn optional_string(value: Option<&str>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request_context::SESSION_COOKIE;
    use serde_json::json;

    fn details() -> ClickDetails {
        ClickDetails {
            destination: "https://example.com/ad".to_string(),
            note: ProcessNote::Valid,
            expired_on: None,
            payload: PayloadFields::new(),
        }
    }

    fn anonymous_context() -> RequestContext {
        let mut ctx = RequestContext {
            host: Some("click.example.com".to_string()),
            user_agent: Some("Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0".to_string()),
            referrer: None,
            client_ip: Some("203.0.113.5".parse().unwrap()),
            ..Default::default()
        };
        ctx.cookies.insert("loid".to_string(), "anon-42".to_string());
        ctx.cookies
            .insert("loidcreated".to_string(), "2017-01-01T00:00:00Z".to_string());
        ctx
    }

    #[test]
    fn test_event_identity() {
        let event = build_click_event(&RequestContext::default(), details());
        assert_eq!(event.topic(), "ad_serving_event");
        assert_eq!(event.event_type(), "ss.ad_click");
    }

    #[test]
    fn test_core_fields() {
        let event = build_click_event(&anonymous_context(), details());

        assert_eq!(event.get("url"), Some(&json!("https://example.com/ad")));
        assert_eq!(event.get("process_notes"), Some(&json!("VALID")));
        assert_eq!(event.get("expired_on"), None);
        assert_eq!(event.get("domain"), Some(&json!("click.example.com")));
        assert_eq!(
            event.get("user_agent_parsed").and_then(|ua| ua.get("browser_name")),
            Some(&json!("Firefox"))
        );
    }

    #[test]
    fn test_expired_on_is_unix_seconds() {
        let mut details = details();
        details.note = ProcessNote::ExpiredSignature;
        details.expired_on = DateTime::from_timestamp(1_600_000_000, 0);

        let event = build_click_event(&RequestContext::default(), details);
        assert_eq!(event.get("expired_on"), Some(&json!(1_600_000_000i64)));
        assert_eq!(event.get("process_notes"), Some(&json!("EXPIRED_SIGNATURE")));
    }

    #[test]
    fn test_anonymous_identity() {
        let event = build_click_event(&anonymous_context(), details());

        assert_eq!(event.get("loid"), Some(&json!("anon-42")));
        assert_eq!(event.get("loid_created"), Some(&json!("2017-01-01T00:00:00Z")));
        assert!(event.get("user_id").is_none());
    }

    #[test]
    fn test_logged_in_identity_excludes_loid() {
        let mut ctx = anonymous_context();
        ctx.cookies
            .insert(SESSION_COOKIE.to_string(), "12345%2Cabc".to_string());

        let event = build_click_event(&ctx, details());
        assert_eq!(event.get("user_id"), Some(&json!(12345)));
        assert!(event.get("loid").is_none());
        assert!(event.get("loid_created").is_none());
    }

    #[test]
    fn test_missing_loid_cookies_are_null() {
        let event = build_click_event(&RequestContext::default(), details());
        assert_eq!(event.get("loid"), Some(&Value::Null));
        assert_eq!(event.get("loid_created"), Some(&Value::Null));
    }

    #[test]
    fn test_referrer_fields() {
        let mut ctx = anonymous_context();
        ctx.referrer = Some("https://www.reddit.com/r/rust/comments/x".to_string());

        let event = build_click_event(&ctx, details());
        assert_eq!(
            event.get("referrer_url"),
            Some(&json!("https://www.reddit.com/r/rust/comments/x"))
        );
        assert_eq!(event.get("referrer_domain"), Some(&json!("www.reddit.com")));
    }

    #[test]
    fn test_no_referrer_fields_without_header() {
        let event = build_click_event(&anonymous_context(), details());
        assert!(event.get("referrer_url").is_none());
        assert!(event.get("referrer_domain").is_none());
    }

    #[test]
    fn test_ipv4_prefixes_are_obfuscated() {
        let event = build_click_event(&anonymous_context(), details());

        assert_eq!(event.get("client_ip"), Some(&json!("203.0.113.5")));
        assert_eq!(event.get("client_ipv4_24"), Some(&json!("203.0.113")));
        assert_eq!(event.get("client_ivp4_16"), Some(&json!("203.0")));
        assert!(event.is_obfuscated("client_ip"));
        assert!(event.is_obfuscated("client_ipv4_24"));
        assert!(event.is_obfuscated("client_ivp4_16"));
        assert!(!event.is_obfuscated("domain"));
    }

    #[test]
    fn test_ipv6_has_no_prefixes() {
        let mut ctx = anonymous_context();
        ctx.client_ip = Some("2001:db8::1".parse().unwrap());

        let event = build_click_event(&ctx, details());
        assert_eq!(event.get("client_ip"), Some(&json!("2001:db8::1")));
        assert!(event.get("client_ipv4_24").is_none());
        assert!(event.get("client_ivp4_16").is_none());
    }

    #[test]
    fn test_no_client_ip() {
        let event = build_click_event(&RequestContext::default(), details());
        assert!(event.get("client_ip").is_none());
    }

    #[test]
    fn test_payload_overrides_context() {
        let mut details = details();
        details.payload.insert("campaign_id".to_string(), json!(42));
        details.payload.insert("domain".to_string(), json!("advertiser.example"));

        let event = build_click_event(&anonymous_context(), details);
        assert_eq!(event.get("campaign_id"), Some(&json!(42)));
        assert_eq!(event.get("domain"), Some(&json!("advertiser.example")));
    }

    #[test]
    fn test_payload_overrides_audit_fields() {
        let mut details = details();
        details.payload.insert("process_notes".to_string(), json!("FROM_PAYLOAD"));
        details
            .payload
            .insert("url".to_string(), json!("https://payload.example/"));

        let event = build_click_event(&RequestContext::default(), details);
        assert_eq!(event.get("process_notes"), Some(&json!("FROM_PAYLOAD")));
        assert_eq!(event.get("url"), Some(&json!("https://payload.example/")));
    }

    #[test]
    fn test_payload_replaces_obfuscated_field_as_plain() {
        let mut details = details();
        details.payload.insert("client_ip".to_string(), json!("redacted"));

        let event = build_click_event(&anonymous_context(), details);
        assert_eq!(event.get("client_ip"), Some(&json!("redacted")));
        assert!(!event.is_obfuscated("client_ip"));
    }
}
