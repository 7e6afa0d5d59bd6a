//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use url::Url;

use crate::api::extractors::ClientIp;
use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code to a live, active link
/// 2. Hand one click event to the background recorder (never blocks)
/// 3. Return `302 Found` with the stored URL in `Location`
///
/// # Click Tracking
///
/// Click events go to a bounded queue. If the queue is full, the click is
/// dropped; the redirect is unaffected.
///
/// # Errors
///
/// Returns 404 Not Found if the code is malformed, unknown, deleted or
/// suspended. Returns 500 only when storage is unavailable.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    client_ip: ClientIp,
) -> Result<Response, AppError> {
    let link = state.link_service.get_by_short_code(&code).await?;

    let location = location_header(&link.long_url)?;

    let event = ClickEvent::new(
        link.id,
        link.long_url,
        client_ip.known().map(|ip| ip.to_string()),
    );
    state.click_recorder.record(event);

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Stored URL as-is when it is a valid header value, otherwise its
/// percent-encoded serialization.
fn location_header(long_url: &str) -> Result<HeaderValue, AppError> {
    if let Ok(value) = HeaderValue::from_str(long_url) {
        return Ok(value);
    }

    Url::parse(long_url)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            AppError::internal(
                "Stored URL cannot be used as a redirect target",
                json!({ "long_url": long_url }),
            )
        })
}
