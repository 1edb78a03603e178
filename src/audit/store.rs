//! SQLite-backed audit log.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};

use crate::audit::types::{AuditEntry, AuditError, AuditRecord, AuditResult, RequestStatus};
use crate::config::DatabaseConfig;
use crate::observability::metrics;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    endpoint TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('Success', 'Failure')),
    response TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

/// Append-only log of outbound provider calls.
///
/// Owns the connection pool; cloning shares the pool.
#[derive(Debug, Clone)]
pub struct AuditLog {
    pool: SqlitePool,
}

impl AuditLog {
    /// Open the database described by `config` and ensure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> AuditResult<Self> {
        let options = config
            .url
            .parse::<SqliteConnectOptions>()?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        // Every connection to an in-memory database sees its own database,
        // so keep exactly one alive for the pool's lifetime.
        if config.url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(options).await?;
        let log = Self::from_pool(pool).await?;

        tracing::info!(url = %config.url, "Audit log connected");
        Ok(log)
    }

    /// Wrap an existing pool, creating the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> AuditResult<Self> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Append one record and return its row id.
    pub async fn record(&self, record: &AuditRecord) -> AuditResult<i64> {
        let result = sqlx::query(
            "INSERT INTO requests (user_id, endpoint, status, response, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.user_id)
        .bind(&record.endpoint)
        .bind(record.status.as_str())
        .bind(&record.response)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        metrics::record_audit_write(record.status);

        let id = result.last_insert_rowid();
        tracing::debug!(
            id,
            endpoint = %record.endpoint,
            status = %record.status,
            "Audit record written"
        );
        Ok(id)
    }

    /// Most recent entries, newest first.
    pub async fn recent(&self, limit: u32) -> AuditResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT id, user_id, endpoint, status, response, created_at
             FROM requests ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Total number of stored entries.
    pub async fn count(&self) -> AuditResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Audit log closed");
    }
}

impl<'r> FromRow<'r, SqliteRow> for AuditEntry {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = RequestStatus::from_str(&status).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            endpoint: row.try_get("endpoint")?,
            status,
            response: row.try_get("response")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
