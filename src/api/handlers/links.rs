//! Handlers for link management endpoints (create, list, get, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkDetailResponse, LinkListResponse, LinkResponse};
use crate::domain::entities::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL for the authenticated user.
///
/// # Endpoint
///
/// `POST /api/v1/url`
///
/// # Request Body
///
/// ```json
/// { "url": "example.com/page" }
/// ```
///
/// A missing scheme is completed to `https://`.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is empty or invalid, 429 when the
/// caller's IP exhausted its creation budget.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(&payload.url, principal.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists the caller's live links, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/url`
///
/// An empty list is a successful response.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_by_owner(principal.user_id).await?;

    Ok(Json(links.into()))
}

/// Returns one link with its interaction count.
///
/// # Endpoint
///
/// `GET /api/v1/url/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link does not exist, was deleted, or belongs
/// to another user and the caller is not an admin.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<LinkDetailResponse>, AppError> {
    let link = state.link_service.get_by_id(id, &principal).await?;
    let interactions = state.link_service.count_interactions(&link).await?;

    Ok(Json(LinkDetailResponse {
        link: link.into(),
        interactions,
    }))
}

/// Soft-deletes a link together with its click logs.
///
/// # Endpoint
///
/// `DELETE /api/v1/url/{id}`
///
/// # Response
///
/// `204 No Content`. The code stops redirecting immediately.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(id, &principal).await?;

    Ok(StatusCode::NO_CONTENT)
}
