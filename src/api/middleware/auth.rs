//! Bearer JWT authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{domain::entities::Principal, error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <jwt>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Verify signature and expiry with [`crate::application::services::AuthService`]
/// 3. Insert the resulting [`Principal`] as a request extension
/// 4. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing, malformed, or the
/// token does not verify. The response carries `WWW-Authenticate: Bearer`
/// per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/url", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let principal = st.auth_service.authenticate(&token)?;
    parts.extensions.insert(principal);

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

/// Lets only admin principals through.
///
/// Must run after [`layer`]. Everyone else gets `404 Not Found`, so admin
/// routes are indistinguishable from missing ones.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = req
        .extensions()
        .get::<Principal>()
        .is_some_and(Principal::is_admin);

    if !is_admin {
        return Err(AppError::not_found("Not found", json!({})));
    }

    Ok(next.run(req).await)
}
