//! Handler for a link's click logs.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::api::dto::logs::{ClickLogItem, ClickLogListResponse, PaginationMeta};
use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// Lists recorded visits of a link, most recent first.
///
/// # Endpoint
///
/// `GET /api/v1/url/{id}/logs`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 25, range: 10..=1000)
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid and 404 Not
/// Found under the same rules as `GET /api/v1/url/{id}`.
pub async fn link_logs_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ClickLogListResponse>, AppError> {
    let (page, page_size) = params.validate()?;

    let link = state.link_service.get_by_id(id, &principal).await?;
    let logs = state
        .click_log_service
        .list_for_link(&link, i64::from(page), i64::from(page_size))
        .await?;

    Ok(Json(ClickLogListResponse {
        pagination: PaginationMeta::new(page, page_size, logs.total),
        items: logs.items.into_iter().map(ClickLogItem::from).collect(),
    }))
}
