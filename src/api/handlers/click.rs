//! Handler for signed click links.

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::error;

use crate::domain::click::ClickParams;
use crate::domain::request_context::RequestContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::resolve_client_ip;

/// Records a click and redirects to its destination.
///
/// # Endpoint
///
/// `GET /click?url=<destination>&data=<base64url json>&hmac=<signature>`
///
/// # Request Flow
///
/// 1. Resolve the client address (peer, or proxy headers when trusted)
/// 2. Capture host, user agent, referrer and cookies
/// 3. Verify, decode and record the click via [`ClickService`]
/// 4. Return 302 Found to the normalized destination
///
/// An event is recorded for every request carrying all three parameters,
/// including ones answered with 400 or 403.
///
/// # Errors
///
/// Returns 400 Bad Request if a parameter is missing or `data` is undecodable.
/// Returns 403 Forbidden if the signature is unreadable or incorrect.
/// Returns 500 Internal Server Error if the normalized destination cannot be
/// sent as a `Location` header.
///
/// [`ClickService`]: crate::application::services::ClickService
pub async fn click_handler(
    State(state): State<AppState>,
    Query(params): Query<ClickParams>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let client_ip = resolve_client_ip(&headers, addr, state.behind_proxy);
    let ctx = RequestContext::from_headers(&headers, Some(client_ip));

    let destination = state.click_service.track_click(&params, &ctx)?;

    let location = HeaderValue::try_from(destination.as_str()).map_err(|e| {
        error!("Normalized destination is not a valid header value: {}", e);
        AppError::internal("unable to build redirect", json!({}))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
