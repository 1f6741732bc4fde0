//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, QueueDetails};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: The event queue is closed
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "event_queue": {
///       "status": "ok",
///       "message": "Free slots: 10000 of 10000",
///       "details": {
///         "accepted": 0,
///         "dropped_oversize": 0,
///         "dropped_queue_full": 0,
///         "max_event_size": 102400
///       }
///     }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let queue_check = check_event_queue(&state);

    let all_healthy = queue_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            event_queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks that the outbound event queue still has a consumer.
fn check_event_queue(state: &AppState) -> CheckStatus {
    let queue = &state.event_queue;
    let stats = queue.stats();
    let details = Some(QueueDetails {
        accepted: stats.accepted,
        dropped_oversize: stats.dropped_oversize,
        dropped_queue_full: stats.dropped_queue_full,
        max_event_size: queue.max_event_size(),
    });

    if queue.is_closed() {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Event queue is closed".to_string()),
            details,
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!(
                "Free slots: {} of {}",
                queue.capacity(),
                queue.max_capacity()
            )),
            details,
        }
    }
}
