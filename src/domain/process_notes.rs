//! Click classification: audit note plus the pending client error, if any.

use std::fmt;

use crate::domain::payload::{DecodeError, PayloadFields};
use crate::domain::signature::SignatureVerdict;

/// Audit classification attached to every click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessNote {
    Valid,
    ExpiredSignature,
    InvalidSignature,
    BadData,
}

impl ProcessNote {
    /// Wire form consumed by the event pipeline.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::ExpiredSignature => "EXPIRED_SIGNATURE",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::BadData => "BAD_DATA",
        }
    }
}

impl fmt::Display for ProcessNote {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client error decided during validation, returned after the event is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingError {
    /// Signature unreadable or incorrect (403).
    Forbidden,
    /// Payload undecodable (400) with the reason shown to the client.
    BadRequest(String),
}

/// Resolves the signature verdict and decode result into a note and an
/// optional pending error.
///
/// Precedence:
///
/// | signature            | payload  | note                | pending        |
/// |----------------------|----------|---------------------|----------------|
/// | valid                | ok       | `VALID`             | none           |
/// | expired              | ok       | `EXPIRED_SIGNATURE` | none           |
/// | unreadable/incorrect | ok       | `INVALID_SIGNATURE` | `Forbidden`    |
/// | any                  | failed   | `BAD_DATA`          | `BadRequest`   |
///
/// A decode failure replaces both the note and any pending forbidden error.
pub fn classify(
    verdict: &SignatureVerdict,
    payload: &Result<PayloadFields, DecodeError>,
) -> (ProcessNote, Option<PendingError>) {
    let (note, pending) = match verdict {
        SignatureVerdict::Valid => (ProcessNote::Valid, None),
        SignatureVerdict::Expired(_) => (ProcessNote::ExpiredSignature, None),
        SignatureVerdict::Unreadable | SignatureVerdict::Incorrect => {
            (ProcessNote::InvalidSignature, Some(PendingError::Forbidden))
        }
    };

    match payload {
        Ok(_) => (note, pending),
        Err(e) => (
            ProcessNote::BadData,
            Some(PendingError::BadRequest(format!("unable to parse `data`: {e}"))),
        ),
    }
}
