use std::str::FromStr;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::types::Json;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use crate::config::VoterConfig;
use crate::documents::{DocumentStore, StoreResult};

/// Document store over a single PostgreSQL JSONB table.
///
/// The table is created by the embedded migrations on first successful use,
/// so the service can start before the database is reachable.
pub struct PgStore {
    pool: PgPool,
    schema: OnceCell<()>,
}

impl PgStore {
    /// Builds a lazily connecting pool; no connection is attempted until the
    /// first query.
    pub fn connect_lazy(config: &VoterConfig) -> StoreResult<Self> {
        let options = PgConnectOptions::from_str(&config.database_url)?
            .application_name("voter-backend")
            .options([("statement_timeout", config.statement_timeout_ms.to_string())]);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(options);

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool, schema: OnceCell::new() }
    }

    async fn ready(&self) -> StoreResult<&PgPool> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::migrate!("./migrations").run(&self.pool).await?;
                info!("📋 Migrations complete");
                Ok::<_, crate::error::StoreError>(())
            })
            .await?;
        Ok(&self.pool)
    }
}

#[rocket::async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let document = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT document FROM voter_documents WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.ready().await?)
        .await?;

        Ok(document.map(|Json(value)| value))
    }

    async fn set(&self, key: &str, document: &Value) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO voter_documents (key, document) VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET document = EXCLUDED.document",
        )
        .bind(key)
        .bind(Json(document))
        .execute(self.ready().await?)
        .await?;

        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM voter_documents WHERE key = ANY($1)")
            .bind(keys)
            .execute(self.ready().await?)
            .await?;

        debug!("Deleted {} of {} documents", result.rows_affected(), keys.len());
        Ok(result.rows_affected())
    }

    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>(
            "SELECT key FROM voter_documents WHERE starts_with(key, $1)",
        )
        .bind(prefix)
        .fetch_all(self.ready().await?)
        .await?;

        Ok(keys)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(self.ready().await?).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
