//! Decoding of the analytics payload carried in the `data` parameter.

use serde_json::{Map, Value};

use crate::utils::base64url;

/// Top-level payload keys mapped to their (unvalidated) JSON values.
pub type PayloadFields = Map<String, Value>;

/// Reasons a payload could not be used.
///
/// Callers only need to know the payload is unusable; the variants exist so
/// the reason can be reported back to the client.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Decodes a base64url-encoded JSON object.
///
/// Padding is optional. Values are passed through untouched; every top-level
/// key becomes a candidate event field.
///
/// # Errors
///
/// Returns [`DecodeError`] if the input is not base64url, the decoded bytes
/// are not JSON, or the JSON document is not an object.
pub fn decode_payload(b64: &[u8]) -> Result<PayloadFields, DecodeError> {
    let json = base64url::decode(b64)?;

    match serde_json::from_slice::<Value>(&json)? {
        Value::Object(fields) => Ok(fields),
        other => Err(DecodeError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
