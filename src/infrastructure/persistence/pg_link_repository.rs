//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "token, target_url, owner_id, click_count, is_active, created_at, expires_at";

/// PostgreSQL repository for link storage and retrieval.
///
/// The `links` primary key on `token` is what turns a concurrent token race
/// into a unique violation, which [`crate::error::map_sqlx_error`] reports as
/// a distinct `Conflict`.
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
        let link = sqlx::query_as::<_, Link>(&format!(
            r#"
            INSERT INTO links (token, target_url, owner_id, is_active, created_at, expires_at)
            VALUES ($1, $2, $3, TRUE, $4, $5)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.token)
        .bind(&new_link.target_url)
        .bind(new_link.owner_id)
        .bind(new_link.created_at)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        let links = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn update_target(&self, token: &str, target_url: &str) -> Result<Link, AppError> {
        sqlx::query_as::<_, Link>(&format!(
            "UPDATE links SET target_url = $2 WHERE token = $1 RETURNING {LINK_COLUMNS}"
        ))
        .bind(token)
        .bind(target_url)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Link not found", json!({ "hash": token })))
    }

    async fn delete(&self, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE token = $1")
            .bind(token)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, token: &str, expires_at: DateTime<Utc>) -> Result<Link, AppError> {
        sqlx::query_as::<_, Link>(&format!(
            "UPDATE links SET is_active = TRUE, expires_at = $2 WHERE token = $1 RETURNING {LINK_COLUMNS}"
        ))
        .bind(token)
        .bind(expires_at)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Link not found", json!({ "hash": token })))
    }

    async fn increment_clicks(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE token = $1")
            .bind(token)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
