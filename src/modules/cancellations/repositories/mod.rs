// Cancellation storage
//
// A CancellationUnit wraps one database transaction. Dropping it without
// calling `commit` rolls every step back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::cancellations::models::{CancellationRecord, CancellationState};
use crate::modules::invoices::models::Invoice;
use crate::modules::invoices::repositories::invoice_repository::{InvoiceRow, SELECT_INVOICE};
use crate::modules::shipments::models::{BookingEvent, DeliveryAssignment, InvoiceRequest};
use crate::modules::shipments::repositories::{InvoiceRequestRow, SELECT_REQUEST};

#[async_trait]
pub trait CancellationStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn CancellationUnit>>;

    async fn find_record(&self, request_id: &str) -> Result<Option<CancellationRecord>>;
}

/// The steps of one cancellation, all inside a single transaction
#[async_trait]
pub trait CancellationUnit: Send {
    /// Load the request and hold it exclusively until commit or rollback
    async fn lock_request(&mut self, request_id: &str) -> Result<Option<InvoiceRequest>>;

    async fn has_record(&mut self, request_id: &str) -> Result<bool>;

    async fn find_invoice(&mut self, request_id: &str) -> Result<Option<Invoice>>;

    async fn find_assignments(&mut self, request_id: &str) -> Result<Vec<DeliveryAssignment>>;

    async fn insert_record(&mut self, record: &CancellationRecord) -> Result<()>;

    async fn delete_invoice(&mut self, request_id: &str) -> Result<()>;

    async fn delete_assignments(&mut self, request_id: &str) -> Result<()>;

    async fn delete_request(&mut self, request_id: &str) -> Result<()>;

    /// False when the booking does not exist
    async fn append_booking_event(&mut self, event: &BookingEvent) -> Result<bool>;

    async fn commit(self: Box<Self>) -> Result<()>;
}

#[derive(Debug, FromRow)]
struct CancellationRow {
    id: String,
    request_id: String,
    invoice_number: String,
    tracking_code: String,
    reason: Option<String>,
    cancelled_by: Option<String>,
    request_snapshot: Json<InvoiceRequest>,
    invoice_snapshot: Option<Json<Invoice>>,
    assignments_snapshot: Json<Vec<DeliveryAssignment>>,
    cancelled_at: DateTime<Utc>,
}

impl From<CancellationRow> for CancellationRecord {
    fn from(row: CancellationRow) -> Self {
        CancellationRecord {
            id: row.id,
            request_id: row.request_id,
            invoice_number: row.invoice_number,
            tracking_code: row.tracking_code,
            state: CancellationState::Cancelled,
            reason: row.reason,
            cancelled_by: row.cancelled_by,
            request: row.request_snapshot.0,
            invoice: row.invoice_snapshot.map(|i| i.0),
            assignments: row.assignments_snapshot.0,
            cancelled_at: row.cancelled_at,
        }
    }
}

pub struct MySqlCancellationStore {
    pool: MySqlPool,
}

impl MySqlCancellationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CancellationStore for MySqlCancellationStore {
    async fn begin(&self) -> Result<Box<dyn CancellationUnit>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlCancellationUnit { tx }))
    }

    async fn find_record(&self, request_id: &str) -> Result<Option<CancellationRecord>> {
        let row = sqlx::query_as::<_, CancellationRow>(
            r#"
            SELECT id, request_id, invoice_number, tracking_code, reason, cancelled_by,
                   request_snapshot, invoice_snapshot, assignments_snapshot, cancelled_at
            FROM cancellation_records
            WHERE request_id = ?
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CancellationRecord::from))
    }
}

pub struct MySqlCancellationUnit {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl CancellationUnit for MySqlCancellationUnit {
    async fn lock_request(&mut self, request_id: &str) -> Result<Option<InvoiceRequest>> {
        let row = sqlx::query_as::<_, InvoiceRequestRow>(&format!(
            "{} WHERE id = ? FOR UPDATE",
            SELECT_REQUEST
        ))
        .bind(request_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(InvoiceRequest::try_from).transpose()
    }

    async fn has_record(&mut self, request_id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cancellation_records WHERE request_id = ?")
                .bind(request_id)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(count > 0)
    }

    async fn find_invoice(&mut self, request_id: &str) -> Result<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{} WHERE request_id = ? FOR UPDATE",
            SELECT_INVOICE
        ))
        .bind(request_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(Invoice::try_from).transpose()
    }

    async fn find_assignments(&mut self, request_id: &str) -> Result<Vec<DeliveryAssignment>> {
        let assignments = sqlx::query_as::<_, DeliveryAssignment>(
            r#"
            SELECT id, request_id, driver_name, scheduled_for, status, created_at
            FROM delivery_assignments
            WHERE request_id = ?
            FOR UPDATE
            "#,
        )
        .bind(request_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(assignments)
    }

    async fn insert_record(&mut self, record: &CancellationRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cancellation_records (
                id, request_id, invoice_number, tracking_code, reason, cancelled_by,
                request_snapshot, invoice_snapshot, assignments_snapshot, cancelled_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.request_id)
        .bind(&record.invoice_number)
        .bind(&record.tracking_code)
        .bind(&record.reason)
        .bind(&record.cancelled_by)
        .bind(Json(&record.request))
        .bind(record.invoice.as_ref().map(Json))
        .bind(Json(&record.assignments))
        .bind(record.cancelled_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => AppError::conflict(format!(
                "invoice request {} is already cancelled",
                record.request_id
            )),
            _ => AppError::Database(e),
        })?;

        Ok(())
    }

    async fn delete_invoice(&mut self, request_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM invoices WHERE request_id = ?")
            .bind(request_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_assignments(&mut self, request_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM delivery_assignments WHERE request_id = ?")
            .bind(request_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_request(&mut self, request_id: &str) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM invoice_requests WHERE id = ?")
            .bind(request_id)
            .execute(&mut *self.tx)
            .await?;

        if deleted.rows_affected() != 1 {
            return Err(AppError::internal(format!(
                "invoice request {} vanished during cancellation",
                request_id
            )));
        }
        Ok(())
    }

    async fn append_booking_event(&mut self, event: &BookingEvent) -> Result<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO booking_events (booking_id, event, detail, occurred_at)
            SELECT id, ?, ?, ? FROM shipment_bookings WHERE id = ?
            "#,
        )
        .bind(&event.event)
        .bind(Json(&event.detail))
        .bind(event.occurred_at)
        .bind(&event.booking_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(inserted.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
