//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository interface for managing short links.
///
/// Every read only sees live rows; soft-deleted links behave exactly like
/// links that never existed.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already used by a
    /// live link. Callers allocating codes retry with a fresh one.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a live link by its short code.
    ///
    /// Suspended links are returned; callers decide whether they redirect.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a live link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError>;

    /// Lists live links owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ShortLink>, AppError>;

    /// Soft-deletes a link by setting `deleted_at = as_of`.
    ///
    /// Returns `Ok(true)` if a live link was deleted, `Ok(false)` if not found
    /// or already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn soft_delete(&self, id: Uuid, as_of: DateTime<Utc>) -> Result<bool, AppError>;

    /// Checks storage connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}
