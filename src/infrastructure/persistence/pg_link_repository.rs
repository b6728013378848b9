//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, LinkStats, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    target_url: String,
    access_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.code,
            r.target_url,
            r.access_count,
            r.created_at,
            r.updated_at,
            r.expires_at,
        )
    }
}

#[derive(FromRow)]
struct StatsRow {
    total_links: i64,
    total_accesses: i64,
    active_links: i64,
    expired_links: i64,
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. Code
/// uniqueness is enforced by the `links_code_key` constraint.
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
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, target_url, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, code, target_url, access_count, created_at, updated_at, expires_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.target_url)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, target_url, access_count, created_at, updated_at, expires_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn increment_access_count(&self, code: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET access_count = access_count + 1, updated_at = NOW()
            WHERE code = $1
            "#,
        )
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }

        Ok(())
    }

    async fn list_by_time_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, target_url, access_count, created_at, updated_at, expires_at
            FROM links
            WHERE created_at BETWEEN $1 AND $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result =
            sqlx::query("DELETE FROM links WHERE expires_at IS NOT NULL AND expires_at < $1")
                .bind(now)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected())
    }

    async fn aggregate_stats(&self, now: DateTime<Utc>) -> Result<LinkStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COUNT(*)::BIGINT AS total_links,
                COALESCE(SUM(access_count), 0)::BIGINT AS total_accesses,
                COUNT(*) FILTER (WHERE expires_at IS NULL OR expires_at >= $1)::BIGINT AS active_links,
                COUNT(*) FILTER (WHERE expires_at < $1)::BIGINT AS expired_links
            FROM links
            "#,
        )
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(LinkStats {
            total_links: row.total_links,
            total_accesses: row.total_accesses,
            active_links: row.active_links,
            expired_links: row.expired_links,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
