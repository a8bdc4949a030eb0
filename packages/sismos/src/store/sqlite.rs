//! SQLite-backed snapshot store.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{ReplaceSummary, SnapshotStore, WRITE_BATCH_SIZE};
use crate::types::SeismicRecord;

/// Snapshot store over a SQLite table keyed by record id.
///
/// The table name comes from configuration and must already be validated
/// as a bare identifier (see `Config::from_env`), since it is interpolated
/// into the SQL text.
pub struct SqliteStore {
    pool: SqlitePool,
    table: String,
}

#[derive(FromRow)]
struct RecordRow {
    id: String,
    fecha_local: String,
    ubicacion: String,
    magnitud: String,
    reporte_origen: String,
}

impl SqliteStore {
    /// Open (or create) the database and ensure the snapshot table exists.
    pub async fn new(database_url: &str, table_name: &str) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Setup(Box::new(e)))?;
        Self::with_pool(pool, table_name).await
    }

    /// In-memory database for tests. Pinned to one connection: with more,
    /// each pooled connection would see its own empty database.
    pub async fn in_memory(table_name: &str) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StoreError::Setup(Box::new(e)))?;
        Self::with_pool(pool, table_name).await
    }

    async fn with_pool(pool: SqlitePool, table_name: &str) -> StoreResult<Self> {
        let store = Self {
            pool,
            table: table_name.to_string(),
        };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                fecha_local TEXT NOT NULL,
                ubicacion TEXT NOT NULL,
                magnitud TEXT NOT NULL,
                reporte_origen TEXT NOT NULL
            )
            "#,
            self.table
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Setup(Box::new(e)))?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn replace_all(&self, records: &[SeismicRecord]) -> StoreResult<ReplaceSummary> {
        // Phase A: scan existing keys, then delete in batches. A single
        // unpaginated scan is acceptable only because the table stays small.
        let ids: Vec<String> = sqlx::query_scalar(&format!("SELECT id FROM {}", self.table))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Scan(Box::new(e)))?;

        for chunk in ids.chunks(WRITE_BATCH_SIZE) {
            let mut query = QueryBuilder::<Sqlite>::new(format!(
                "DELETE FROM {} WHERE id IN (",
                self.table
            ));
            let mut separated = query.separated(", ");
            for id in chunk {
                separated.push_bind(id);
            }
            query.push(")");
            query
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Purge(Box::new(e)))?;
        }

        // Phase B: batched multi-row inserts. No rollback of phase A if
        // this fails.
        for chunk in records.chunks(WRITE_BATCH_SIZE) {
            let mut query = QueryBuilder::<Sqlite>::new(format!(
                "INSERT INTO {} (id, fecha_local, ubicacion, magnitud, reporte_origen) ",
                self.table
            ));
            query.push_values(chunk, |mut row, record| {
                row.push_bind(record.id.to_string())
                    .push_bind(&record.local_datetime)
                    .push_bind(&record.location)
                    .push_bind(&record.magnitude)
                    .push_bind(&record.origin_report);
            });
            query
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Load(Box::new(e)))?;
        }

        let summary = ReplaceSummary {
            purged: ids.len(),
            loaded: records.len(),
        };
        debug!(
            table = %self.table,
            purged = summary.purged,
            loaded = summary.loaded,
            "snapshot replaced"
        );
        Ok(summary)
    }

    async fn fetch_all(&self) -> StoreResult<Vec<SeismicRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT id, fecha_local, ubicacion, magnitud, reporte_origen FROM {}",
            self.table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Scan(Box::new(e)))?;

        rows.into_iter()
            .map(|row| {
                let id = Uuid::parse_str(&row.id).map_err(|e| StoreError::Scan(Box::new(e)))?;
                Ok(SeismicRecord {
                    id,
                    origin_report: row.reporte_origen,
                    location: row.ubicacion,
                    local_datetime: row.fecha_local,
                    magnitude: row.magnitud,
                })
            })
            .collect()
    }
}
