//! Admin-only handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::api::dto::link::LinkListResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the live links of any user.
///
/// # Endpoint
///
/// `GET /api/v1/admin/user/{id}/urls`
///
/// Guarded by [`crate::api::middleware::auth::require_admin`]; non-admins
/// get 404.
pub async fn user_links_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_by_owner(user_id).await?;

    Ok(Json(links.into()))
}
