//! Link registry: creation, lookup and deletion of short links.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{LinkStatus, NewShortLink, Principal, ShortLink};
use crate::domain::repositories::{ClickLogRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::{generate_short_code, is_short_code};
use crate::utils::url_normalizer::normalize_long_url;

/// Default bound on code allocation attempts per created link.
pub const DEFAULT_CODE_MAX_ATTEMPTS: usize = 5;

/// Service for creating, resolving and deleting short links.
///
/// Deleted, suspended and never-existing links are reported identically, and
/// links owned by someone else are reported as missing to non-admins.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    click_logs: Arc<dyn ClickLogRepository>,
    max_code_attempts: usize,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        click_logs: Arc<dyn ClickLogRepository>,
        max_code_attempts: usize,
    ) -> Self {
        Self {
            links,
            click_logs,
            max_code_attempts,
        }
    }

    /// Creates a short link for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an http(s) URL with
    /// a host; nothing is persisted in that case.
    ///
    /// Returns [`AppError::Internal`] if no unique code could be allocated or
    /// storage fails.
    pub async fn create(&self, long_url: &str, owner_id: Uuid) -> Result<ShortLink, AppError> {
        let long_url = normalize_long_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let link = insert_with_unique_code(
            self.links.as_ref(),
            owner_id,
            long_url,
            self.max_code_attempts,
            generate_short_code,
        )
        .await?;

        info!(link_id = %link.id, code = %link.short_code, %owner_id, "Short link created");
        Ok(link)
    }

    /// Resolves a short code to a link that may be redirected to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for malformed, unknown, deleted or
    /// suspended codes. Malformed codes never reach storage.
    pub async fn get_by_short_code(&self, code: &str) -> Result<ShortLink, AppError> {
        let not_found = || AppError::not_found("Short link not found", json!({ "code": code }));

        if !is_short_code(code) {
            return Err(not_found());
        }

        self.links
            .find_by_code(code)
            .await?
            .filter(ShortLink::is_redirectable)
            .ok_or_else(not_found)
    }

    /// Fetches a link visible to `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist, is deleted,
    /// or belongs to another user and the caller is not an admin.
    pub async fn get_by_id(&self, id: Uuid, principal: &Principal) -> Result<ShortLink, AppError> {
        self.links
            .find_by_id(id)
            .await?
            .filter(|link| principal.can_access(link.owner_id))
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    /// Lists live links of `owner_id`, newest first. May be empty.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ShortLink>, AppError> {
        self.links.list_by_owner(owner_id).await
    }

    /// Soft-deletes a link and its click logs.
    ///
    /// Logs go first, then the link, both stamped with the same instant. If
    /// the logs cannot be deleted the link is left untouched. A final pass
    /// catches clicks written while the link was still live.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] under the same rules as
    /// [`Self::get_by_id`], or if the link disappeared concurrently.
    pub async fn delete(&self, id: Uuid, principal: &Principal) -> Result<(), AppError> {
        let link = self.get_by_id(id, principal).await?;
        let now = Utc::now();

        let logs_deleted = self.click_logs.soft_delete_for_link(link.id, now).await?;

        if !self.links.soft_delete(link.id, now).await? {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "id": id }),
            ));
        }

        let stragglers = match self.click_logs.soft_delete_for_link(link.id, now).await {
            Ok(n) => n,
            Err(e) => {
                warn!(link_id = %link.id, error = %e, "Failed to sweep late click logs");
                0
            }
        };

        info!(
            link_id = %link.id,
            logs_deleted = logs_deleted + stragglers,
            by = %principal.user_id,
            "Short link deleted"
        );
        Ok(())
    }

    /// Number of live click logs recorded for `link`.
    pub async fn count_interactions(&self, link: &ShortLink) -> Result<i64, AppError> {
        self.click_logs.count_for_link(link.id).await
    }

    /// Checks that link storage is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.links.ping().await
    }
}

/// Inserts a new active link, drawing a fresh code after each collision.
///
/// The store's unique index decides what a collision is: only
/// [`AppError::Conflict`] triggers another attempt, any other error is
/// returned as-is. The link id stays the same across attempts.
///
/// # Errors
///
/// Returns [`AppError::Internal`] after `max_attempts` collisions.
pub async fn insert_with_unique_code<G>(
    links: &dyn LinkRepository,
    owner_id: Uuid,
    long_url: String,
    max_attempts: usize,
    mut generate: G,
) -> Result<ShortLink, AppError>
where
    G: FnMut() -> Result<String, AppError>,
{
    let id = Uuid::now_v7();

    for attempt in 1..=max_attempts {
        let new_link = NewShortLink {
            id,
            owner_id,
            long_url: long_url.clone(),
            short_code: generate()?,
            status: LinkStatus::Active,
        };

        match links.create(new_link).await {
            Ok(link) => return Ok(link),
            Err(AppError::Conflict { .. }) => {
                warn!(attempt, max_attempts, "Short code collision, regenerating");
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::internal(
        "Failed to generate unique code",
        json!({ "reason": "Too many collisions", "attempts": max_attempts }),
    ))
}
