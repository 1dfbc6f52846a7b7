//! Postgres-backed remote store for the hosted `site_content` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use super::remote::{RemoteError, RemoteRow, RemoteStore};

#[derive(Debug, Clone)]
pub struct PgRemoteStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct SiteContentRecord {
    id: String,
    content: Option<Value>,
    updated_at: DateTime<Utc>,
}

impl SiteContentRecord {
    fn into_row(self) -> RemoteRow {
        RemoteRow {
            id: self.id,
            content: self.content.unwrap_or(Value::Null),
            updated_at: self.updated_at,
        }
    }
}

impl PgRemoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool that connects on first use.
    ///
    /// An unreachable database then shows up as a failed fetch, which the
    /// engine recovers from, instead of failing startup.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self, RemoteError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)?;
        Ok(Self::new(pool))
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RemoteStore for PgRemoteStore {
    async fn fetch(&self, id: &str) -> Result<Option<RemoteRow>, RemoteError> {
        let record = sqlx::query_as::<_, SiteContentRecord>(
            "SELECT id, content, updated_at FROM site_content WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(SiteContentRecord::into_row))
    }

    async fn upsert(
        &self,
        id: &str,
        content: &Value,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RemoteError> {
        sqlx::query(
            "INSERT INTO site_content (id, content, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE \
             SET content = EXCLUDED.content, updated_at = EXCLUDED.updated_at",
        )
        .bind(id)
        .bind(Json(content))
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(row_id = id, "Upserted remote content row");
        Ok(())
    }
}
