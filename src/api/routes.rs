//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, link_logs_handler,
    list_links_handler, user_links_handler,
};
use crate::api::middleware::{auth, rate_limit};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /url`                   - Shorten a URL (rate limited per client IP)
/// - `GET    /url`                   - List the caller's links
/// - `GET    /url/{id}`              - Link details with interaction count
/// - `DELETE /url/{id}`              - Soft-delete a link and its click logs
/// - `GET    /url/{id}/logs`         - Paginated click logs of a link
/// - `GET    /admin/user/{id}/urls`  - Links of any user (admin only)
pub fn protected_routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/user/{id}/urls", get(user_links_handler))
        .route_layer(middleware::from_fn(auth::require_admin));

    Router::new()
        .route(
            "/url",
            post(create_link_handler)
                .route_layer(middleware::from_fn_with_state(state, rate_limit::general))
                .get(list_links_handler),
        )
        .route(
            "/url/{id}",
            get(get_link_handler).delete(delete_link_handler),
        )
        .route("/url/{id}/logs", get(link_logs_handler))
        .nest("/admin", admin)
}
