//! Click tracking service: verify, decode, record, decide.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::click::ClickParams;
use crate::domain::enricher::{ClickDetails, build_click_event};
use crate::domain::payload::decode_payload;
use crate::domain::process_notes::{PendingError, classify};
use crate::domain::request_context::RequestContext;
use crate::domain::signature::{SignatureVerdict, SignatureVerifier, canonical_message};
use crate::error::AppError;
use crate::infrastructure::events::EventQueue;
use crate::utils::url_normalizer::fix_query_encoding;

/// Processes signed click links.
///
/// Every request that carries all three parameters is recorded as exactly
/// one `ad_click` event, whatever the outcome; only the HTTP response
/// depends on validation:
///
/// | signature            | payload | response |
/// |----------------------|---------|----------|
/// | valid / expired      | ok      | redirect |
/// | unreadable/incorrect | ok      | 403      |
/// | any                  | failed  | 400      |
pub struct ClickService {
    verifier: SignatureVerifier,
    event_queue: EventQueue,
}

impl ClickService {
    /// Creates a new click service.
    ///
    /// # Arguments
    ///
    /// - `verifier` - signature verifier holding the shared click secret
    /// - `event_queue` - process-wide outbound event queue
    pub fn new(verifier: SignatureVerifier, event_queue: EventQueue) -> Self {
        Self {
            verifier,
            event_queue,
        }
    }

    /// Tracks one click and returns the redirect destination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a parameter is missing (no event
    /// is recorded) or the payload cannot be decoded.
    /// Returns [`AppError::Forbidden`] if the signature is unreadable or incorrect.
    pub fn track_click(
        &self,
        params: &ClickParams,
        ctx: &RequestContext,
    ) -> Result<String, AppError> {
        self.track_click_at(params, ctx, Utc::now())
    }

    /// Same as [`Self::track_click`] with an explicit verification instant.
    pub fn track_click_at(
        &self,
        params: &ClickParams,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let Some((url, data, hmac)) = params.required() else {
            return Err(AppError::bad_request(
                "missing required query parameters",
                json!({ "required": ["url", "data", "hmac"] }),
            ));
        };

        let message = canonical_message(url, data);
        let verdict = self.verifier.verify(&message, hmac.as_bytes(), now);

        let expired_on = match verdict {
            SignatureVerdict::Valid => {
                metrics::counter!("click.signature.success").increment(1);
                None
            }
            SignatureVerdict::Expired(expiration) => {
                metrics::counter!("click.signature.expired").increment(1);
                debug!(%expiration, "Click signature expired");
                Some(expiration)
            }
            SignatureVerdict::Unreadable | SignatureVerdict::Incorrect => {
                metrics::counter!("click.signature.error").increment(1);
                warn!(?verdict, "Click signature rejected");
                None
            }
        };

        let payload = decode_payload(data.as_bytes());
        if let Err(e) = &payload {
            metrics::counter!("click.data.parse_error").increment(1);
            debug!("Unable to parse click data: {}", e);
        }

        let (note, pending) = classify(&verdict, &payload);

        let destination = fix_query_encoding(url);

        let event = build_click_event(
            ctx,
            ClickDetails {
                destination: destination.clone(),
                note,
                expired_on,
                payload: payload.unwrap_or_default(),
            },
        );
        let outcome = self.event_queue.publish(&event);
        debug!(note = %note, ?outcome, "Click recorded");

        match pending {
            None => Ok(destination),
            Some(PendingError::Forbidden) => Err(AppError::forbidden(
                "invalid signature",
                json!({ "process_notes": note.as_str() }),
            )),
            Some(PendingError::BadRequest(message)) => Err(AppError::bad_request(
                message,
                json!({ "process_notes": note.as_str() }),
            )),
        }
    }

    /// The queue events are published to.
    pub fn event_queue(&self) -> &EventQueue {
        &self.event_queue
    }
}
