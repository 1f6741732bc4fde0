//! HMAC signature verification for tracking links.
//!
//! # Signature Format
//!
//! ```text
//! signature = base64url( header || digest )
//! header    = version (u8, = 1) || 2 zero bytes || expiration (u32 LE, unix seconds)
//! digest    = HMAC-SHA256(secret, header || message)
//! ```
//!
//! The signed message for a click is `url|data` (see [`canonical_message`]).
//! Both parts come from delimiter-safe encodings, so the join is unambiguous.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::utils::base64url;

type HmacSha256 = Hmac<Sha256>;

/// Only signature layout currently issued by link generators.
pub const SIGNATURE_VERSION: u8 = 1;

/// Version byte, two padding bytes, little-endian `u32` expiration.
pub const HEADER_SIZE: usize = 7;

/// Length of an HMAC-SHA256 output.
pub const DIGEST_SIZE: usize = 32;

/// Separator between the destination and the payload in the signed message.
pub const MESSAGE_DELIMITER: u8 = b'|';

/// Outcome of checking one signature.
///
/// An expired signature is still authentic and the click may be honored;
/// unreadable and incorrect signatures are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureVerdict {
    /// Authentic and not yet expired.
    Valid,
    /// Authentic, but the embedded expiration is in the past.
    Expired(DateTime<Utc>),
    /// Not decodable as a signature at all.
    Unreadable,
    /// Well-formed but the digest does not match the message.
    Incorrect,
}

/// Builds the message a click link is signed over: `url|data`.
pub fn canonical_message(url: &str, data: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(url.len() + data.len() + 1);
    message.extend_from_slice(url.as_bytes());
    message.push(MESSAGE_DELIMITER);
    message.extend_from_slice(data.as_bytes());
    message
}

/// Verifies link signatures against a shared secret.
///
/// Immutable after construction; share it behind an `Arc` across request
/// handlers without further synchronization.
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl SignatureVerifier {
    /// Creates a verifier for the given shared secret.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Checks `mac` against `message` at instant `now`.
    ///
    /// The digest is compared in constant time. Expiration is only consulted
    /// once the digest matches, so a tampered link is reported as
    /// [`SignatureVerdict::Incorrect`] even when its expiration has passed.
    pub fn verify(&self, message: &[u8], mac: &[u8], now: DateTime<Utc>) -> SignatureVerdict {
        let Ok(raw) = base64url::decode(mac) else {
            return SignatureVerdict::Unreadable;
        };

        if raw.len() != HEADER_SIZE + DIGEST_SIZE {
            return SignatureVerdict::Unreadable;
        }

        let (header, digest) = raw.split_at(HEADER_SIZE);
        if header[0] != SIGNATURE_VERSION {
            return SignatureVerdict::Unreadable;
        }

        let expiration = u32::from_le_bytes([header[3], header[4], header[5], header[6]]);

        let mut hmac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts any key length");
        hmac.update(header);
        hmac.update(message);

        if hmac.verify_slice(digest).is_err() {
            return SignatureVerdict::Incorrect;
        }

        let expires_at = DateTime::from_timestamp(i64::from(expiration), 0).unwrap_or_default();

        if expires_at < now {
            SignatureVerdict::Expired(expires_at)
        } else {
            SignatureVerdict::Valid
        }
    }
}
