use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::carriers::models::{CarrierSyncRecord, SyncStatus};

#[async_trait]
pub trait CarrierSyncRepository: Send + Sync {
    /// Insert or update a record by id
    async fn save(&self, record: &CarrierSyncRecord) -> Result<()>;

    async fn find_by_invoice_id(&self, invoice_id: &str) -> Result<Option<CarrierSyncRecord>>;

    /// PENDING and FAILED records, oldest first
    async fn find_unsynced(&self, limit: i64) -> Result<Vec<CarrierSyncRecord>>;
}

#[derive(Debug, FromRow)]
struct SyncRecordRow {
    id: String,
    invoice_id: String,
    request_id: String,
    status: String,
    attempts: u32,
    last_error: Option<String>,
    carrier_reference: Option<String>,
    payload: Json<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SyncRecordRow> for CarrierSyncRecord {
    type Error = AppError;

    fn try_from(row: SyncRecordRow) -> Result<Self> {
        Ok(CarrierSyncRecord {
            id: row.id,
            invoice_id: row.invoice_id,
            request_id: row.request_id,
            status: row.status.parse()?,
            attempts: row.attempts,
            last_error: row.last_error,
            carrier_reference: row.carrier_reference,
            payload: row.payload.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_SYNC_RECORD: &str = r#"
    SELECT id, invoice_id, request_id, status, attempts, last_error, carrier_reference,
           payload, created_at, updated_at
    FROM carrier_sync_records
"#;

pub struct MySqlCarrierSyncRepository {
    pool: MySqlPool,
}

impl MySqlCarrierSyncRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarrierSyncRepository for MySqlCarrierSyncRepository {
    async fn save(&self, record: &CarrierSyncRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO carrier_sync_records (
                id, invoice_id, request_id, status, attempts, last_error, carrier_reference,
                payload, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                status = VALUES(status),
                attempts = VALUES(attempts),
                last_error = VALUES(last_error),
                carrier_reference = VALUES(carrier_reference),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(&record.id)
        .bind(&record.invoice_id)
        .bind(&record.request_id)
        .bind(record.status.as_str())
        .bind(record.attempts)
        .bind(&record.last_error)
        .bind(&record.carrier_reference)
        .bind(Json(&record.payload))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_invoice_id(&self, invoice_id: &str) -> Result<Option<CarrierSyncRecord>> {
        let row = sqlx::query_as::<_, SyncRecordRow>(&format!(
            "{} WHERE invoice_id = ? ORDER BY created_at DESC LIMIT 1",
            SELECT_SYNC_RECORD
        ))
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CarrierSyncRecord::try_from).transpose()
    }

    async fn find_unsynced(&self, limit: i64) -> Result<Vec<CarrierSyncRecord>> {
        let rows = sqlx::query_as::<_, SyncRecordRow>(&format!(
            "{} WHERE status IN (?, ?) ORDER BY created_at LIMIT ?",
            SELECT_SYNC_RECORD
        ))
        .bind(SyncStatus::Pending.as_str())
        .bind(SyncStatus::Failed.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CarrierSyncRecord::try_from).collect()
    }
}
