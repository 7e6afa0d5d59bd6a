//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Lifecycle, LinkStatus, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: Uuid,
    owner_id: Uuid,
    long_url: String,
    short_code: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink {
            id: row.id,
            owner_id: row.owner_id,
            long_url: row.long_url,
            short_code: row.short_code,
            status: LinkStatus::parse(&row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
            lifecycle: Lifecycle::from_deleted_at(row.deleted_at),
        }
    }
}

/// PostgreSQL repository for short links.
///
/// Uniqueness of live short codes is enforced by the partial unique index
/// `short_links_live_code_key`; a violation surfaces as [`AppError::Conflict`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            INSERT INTO short_links (id, owner_id, long_url, short_code, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, long_url, short_code, status,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(new_link.id)
        .bind(new_link.owner_id)
        .bind(&new_link.long_url)
        .bind(&new_link.short_code)
        .bind(new_link.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, owner_id, long_url, short_code, status,
                   created_at, updated_at, deleted_at
            FROM short_links
            WHERE short_code = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, owner_id, long_url, short_code, status,
                   created_at, updated_at, deleted_at
            FROM short_links
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, owner_id, long_url, short_code, status,
                   created_at, updated_at, deleted_at
            FROM short_links
            WHERE owner_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn soft_delete(&self, id: Uuid, as_of: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE short_links
            SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(as_of)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
