//! Repository trait for click log storage.

use crate::domain::entities::{ClickLog, NewClickLog};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository interface for click logs.
///
/// Logs are append-only; the only mutation is the bulk soft delete performed
/// when their link is deleted.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickLogRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickLogRepository: Send + Sync {
    /// Persists a click log.
    ///
    /// Idempotent on `new_log.id`: inserting the same id twice stores one row,
    /// so a retried write after an ambiguous failure is safe.
    /// Nothing is stored once the owning link is soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_log: NewClickLog) -> Result<(), AppError>;

    /// Soft-deletes every live log of a link, stamping them with `as_of`.
    ///
    /// Returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn soft_delete_for_link(
        &self,
        link_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<u64, AppError>;

    /// Counts live logs of a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_for_link(&self, link_id: Uuid) -> Result<i64, AppError>;

    /// Lists live logs of a link, most recent visit first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_link(
        &self,
        link_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ClickLog>, AppError>;
}
