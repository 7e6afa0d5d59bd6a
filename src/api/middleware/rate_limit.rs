//! Per-client-IP rate limiting middleware.
//!
//! Each middleware consults one named limiter from
//! [`crate::application::services::RateLimits`] and aborts the request with
//! `429 Too Many Requests` once the client's bucket is empty.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::extractors::ClientIp;
use crate::application::services::RateLimiter;
use crate::error::AppError;
use crate::state::AppState;

/// General policy: guards link creation.
///
/// # Example
///
/// ```rust,ignore
/// let routes = Router::new().route(
///     "/url",
///     post(create_link_handler)
///         .route_layer(middleware::from_fn_with_state(state, rate_limit::general)),
/// );
/// ```
pub async fn general(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    admit(&state.rate_limits.general, ip, req, next).await
}

/// Stricter policy for endpoints that issue one-time codes.
pub async fn otp(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    admit(&state.rate_limits.otp, ip, req, next).await
}

async fn admit(
    limiter: &RateLimiter,
    ip: std::net::IpAddr,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    limiter.check(ip)?;
    Ok(next.run(req).await)
}
