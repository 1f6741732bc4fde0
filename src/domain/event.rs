//! Event records handed to the event collector.
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "event_topic": "ad_serving_event",
//!   "event_type": "ss.ad_click",
//!   "event_ts": 1700000000000,
//!   "uuid": "6f1c…",
//!   "payload": {
//!     "url": "https://example.com/ad",
//!     "process_notes": "VALID",
//!     "obfuscated_data": { "client_ip": "203.0.113.5" }
//!   }
//! }
//! ```
//!
//! Fields tagged [`FieldKind::Obfuscated`] are grouped under `obfuscated_data`
//! and irreversibly transformed by the collector after ingestion.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Namespace tag prefixed to every event type emitted by this service.
pub const EVENT_TYPE_NAMESPACE: &str = "ss";

/// Whether a field is forwarded as-is or obfuscated downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Plain,
    Obfuscated,
}

/// One named event value.
#[derive(Debug, Clone, PartialEq)]
pub struct EventField {
    pub value: Value,
    pub kind: FieldKind,
}

/// An analytics event ready for publication.
///
/// Field order is insertion order. Setting a field that already exists
/// replaces its value and kind in place.
#[derive(Debug, Clone)]
pub struct EventRecord {
    topic: String,
    event_type: String,
    timestamp: DateTime<Utc>,
    id: Uuid,
    fields: Vec<(String, EventField)>,
}

impl EventRecord {
    /// Creates an empty event stamped with the current time and a random id.
    ///
    /// `event_type` is namespaced, so `"ad_click"` becomes `"ss.ad_click"`.
    pub fn new(topic: impl Into<String>, event_type: &str) -> Self {
        Self::with_identity(topic, event_type, Utc::now(), Uuid::new_v4())
    }

    /// Creates an empty event with an explicit timestamp and id.
    pub fn with_identity(
        topic: impl Into<String>,
        event_type: &str,
        timestamp: DateTime<Utc>,
        id: Uuid,
    ) -> Self {
        Self {
            topic: topic.into(),
            event_type: format!("{EVENT_TYPE_NAMESPACE}.{event_type}"),
            timestamp,
            id,
            fields: Vec::new(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Sets a plain field.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.insert(key.into(), value.into(), FieldKind::Plain);
    }

    /// Sets a field that the collector must obfuscate.
    pub fn set_obfuscated_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.insert(key.into(), value.into(), FieldKind::Obfuscated);
    }

    fn insert(&mut self, key: String, value: Value, kind: FieldKind) {
        let field = EventField { value, kind };
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((key, field)),
        }
    }

    /// Looks up a field by name.
    pub fn field(&self, key: &str) -> Option<&EventField> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    /// Looks up a field value by name, regardless of kind.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.field(key).map(|f| &f.value)
    }

    /// Returns true if `key` is set and tagged for obfuscation.
    pub fn is_obfuscated(&self, key: &str) -> bool {
        self.field(key)
            .is_some_and(|f| f.kind == FieldKind::Obfuscated)
    }

    /// Iterates fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &EventField)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    /// Builds the collector wire representation.
    pub fn to_json(&self) -> Value {
        let mut payload = Map::new();
        let mut obfuscated = Map::new();

        for (key, field) in &self.fields {
            let target = match field.kind {
                FieldKind::Plain => &mut payload,
                FieldKind::Obfuscated => &mut obfuscated,
            };
            target.insert(key.clone(), field.value.clone());
        }

        if !obfuscated.is_empty() {
            payload.insert("obfuscated_data".to_string(), Value::Object(obfuscated));
        }

        serde_json::json!({
            "event_topic": self.topic,
            "event_type": self.event_type,
            "event_ts": self.timestamp.timestamp_millis(),
            "uuid": self.id.to_string(),
            "payload": payload,
        })
    }

    /// Serializes the event to the bytes placed on the outbound queue.
    pub fn serialize(&self) -> Vec<u8> {
        self.to_json().to_string().into_bytes()
    }
}
