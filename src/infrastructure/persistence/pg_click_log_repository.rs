//! PostgreSQL implementation of click log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{ClickLog, GeoInfo, Lifecycle, NewClickLog, ProbeOutcome};
use crate::domain::repositories::ClickLogRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ClickLogRow {
    id: Uuid,
    link_id: Uuid,
    visited_at: DateTime<Utc>,
    client_ip: Option<String>,
    country: Option<String>,
    city: Option<String>,
    http_status_code: Option<i32>,
    redirect_status: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ClickLogRow> for ClickLog {
    fn from(row: ClickLogRow) -> Self {
        let geo = GeoInfo {
            country: row.country,
            city: row.city,
        };

        let outcome = row.http_status_code.map(|http_status_code| ProbeOutcome {
            http_status_code,
            redirect_status: row.redirect_status.unwrap_or_default(),
        });

        ClickLog {
            id: row.id,
            link_id: row.link_id,
            visited_at: row.visited_at,
            client_ip: row.client_ip,
            geo: (!geo.is_empty()).then_some(geo),
            outcome,
            created_at: row.created_at,
            updated_at: row.updated_at,
            lifecycle: Lifecycle::from_deleted_at(row.deleted_at),
        }
    }
}

/// PostgreSQL repository for click logs.
pub struct PgClickLogRepository {
    pool: Arc<PgPool>,
}

impl PgClickLogRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickLogRepository for PgClickLogRepository {
    async fn create(&self, new_log: NewClickLog) -> Result<(), AppError> {
        let (country, city) = match new_log.geo {
            Some(geo) => (geo.country, geo.city),
            None => (None, None),
        };
        let (http_status_code, redirect_status) = match new_log.outcome {
            Some(outcome) => (Some(outcome.http_status_code), Some(outcome.redirect_status)),
            None => (None, None),
        };

        // FOR SHARE makes a concurrent link delete wait for this insert to commit.
        let result = sqlx::query(
            r#"
            INSERT INTO click_logs
                (id, link_id, visited_at, client_ip, country, city,
                 http_status_code, redirect_status)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            FROM short_links
            WHERE id = $2 AND deleted_at IS NULL
            FOR SHARE
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(new_log.id)
        .bind(new_log.link_id)
        .bind(new_log.visited_at)
        .bind(new_log.client_ip)
        .bind(country)
        .bind(city)
        .bind(http_status_code)
        .bind(redirect_status)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(
                click_id = %new_log.id,
                "Click log not stored, duplicate or link deleted"
            );
        }

        Ok(())
    }

    async fn soft_delete_for_link(
        &self,
        link_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE click_logs
            SET deleted_at = $2, updated_at = $2
            WHERE link_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(link_id)
        .bind(as_of)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_for_link(&self, link_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM click_logs WHERE link_id = $1 AND deleted_at IS NULL",
        )
        .bind(link_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn list_for_link(
        &self,
        link_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ClickLog>, AppError> {
        let rows = sqlx::query_as::<_, ClickLogRow>(
            r#"
            SELECT id, link_id, visited_at, client_ip, country, city,
                   http_status_code, redirect_status,
                   created_at, updated_at, deleted_at
            FROM click_logs
            WHERE link_id = $1 AND deleted_at IS NULL
            ORDER BY visited_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(link_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
