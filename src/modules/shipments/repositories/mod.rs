// Invoice request persistence
//
// Every write to invoice_requests is guarded by the version column the
// caller read; a mismatch surfaces as a conflict instead of a lost update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::pricing::models::{Classification, ServiceRoute};
use crate::modules::shipments::models::{
    BoxDetail, DeliveryAssignment, InvoiceRequest, RequestStatus, ShipmentVerification,
};

#[async_trait]
pub trait InvoiceRequestRepository: Send + Sync {
    async fn create(&self, request: &InvoiceRequest) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<InvoiceRequest>>;

    /// Attach a verification snapshot and move the request to VERIFIED.
    ///
    /// Fails with a conflict when `expected_version` is stale or the request
    /// was already invoiced.
    async fn save_verification(
        &self,
        id: &str,
        verification: &ShipmentVerification,
        expected_version: i64,
    ) -> Result<InvoiceRequest>;

    async fn add_delivery_assignment(&self, assignment: &DeliveryAssignment) -> Result<()>;

    async fn find_delivery_assignments(&self, request_id: &str) -> Result<Vec<DeliveryAssignment>>;
}

/// Database row for invoice_requests
#[derive(Debug, FromRow)]
pub(crate) struct InvoiceRequestRow {
    pub id: String,
    pub invoice_number: String,
    pub tracking_code: String,
    pub client_id: String,
    pub service_route: String,
    pub status: String,
    pub sender_delivery_option: String,
    pub insured: bool,
    pub declared_value: Option<Decimal>,
    pub shipment_classification: Option<String>,
    pub boxes: Json<Vec<BoxDetail>>,
    pub verification: Option<Json<ShipmentVerification>>,
    pub booking_id: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRequestRow> for InvoiceRequest {
    type Error = AppError;

    fn try_from(row: InvoiceRequestRow) -> Result<Self> {
        Ok(InvoiceRequest {
            id: row.id,
            invoice_number: row.invoice_number,
            tracking_code: row.tracking_code,
            client_id: row.client_id,
            service_route: ServiceRoute::parse(&row.service_route)?,
            status: row.status.parse()?,
            sender_delivery_option: row.sender_delivery_option.parse()?,
            insured: row.insured,
            declared_value: row.declared_value,
            shipment_classification: row
                .shipment_classification
                .as_deref()
                .and_then(Classification::parse),
            boxes: row.boxes.0,
            verification: row.verification.map(|v| v.0),
            booking_id: row.booking_id,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) const SELECT_REQUEST: &str = r#"
    SELECT id, invoice_number, tracking_code, client_id, service_route, status,
           sender_delivery_option, insured, declared_value, shipment_classification,
           boxes, verification, booking_id, version, created_at, updated_at
    FROM invoice_requests
"#;

/// MySQL implementation of InvoiceRequestRepository
pub struct MySqlInvoiceRequestRepository {
    pool: MySqlPool,
}

impl MySqlInvoiceRequestRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRequestRepository for MySqlInvoiceRequestRepository {
    async fn create(&self, request: &InvoiceRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoice_requests (
                id, invoice_number, tracking_code, client_id, service_route, status,
                sender_delivery_option, insured, declared_value, shipment_classification,
                boxes, verification, booking_id, version, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.id)
        .bind(&request.invoice_number)
        .bind(&request.tracking_code)
        .bind(&request.client_id)
        .bind(request.service_route.code())
        .bind(request.status.as_str())
        .bind(request.sender_delivery_option.as_str())
        .bind(request.insured)
        .bind(request.declared_value)
        .bind(request.shipment_classification.as_ref().map(|c| c.as_str().to_string()))
        .bind(Json(&request.boxes))
        .bind(request.verification.as_ref().map(Json))
        .bind(&request.booking_id)
        .bind(request.version)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => AppError::conflict(format!(
                "invoice request {} already exists",
                request.id
            )),
            _ => AppError::Database(e),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InvoiceRequest>> {
        let row = sqlx::query_as::<_, InvoiceRequestRow>(&format!("{} WHERE id = ?", SELECT_REQUEST))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(InvoiceRequest::try_from).transpose()
    }

    async fn save_verification(
        &self,
        id: &str,
        verification: &ShipmentVerification,
        expected_version: i64,
    ) -> Result<InvoiceRequest> {
        let result = sqlx::query(
            r#"
            UPDATE invoice_requests
            SET verification = ?, declared_value = ?, shipment_classification = ?, boxes = ?,
                status = ?, version = version + 1, updated_at = ?
            WHERE id = ? AND version = ? AND status NOT IN (?, ?)
            "#,
        )
        .bind(Json(verification))
        .bind(verification.declared_value)
        .bind(
            verification
                .shipment_classification
                .as_ref()
                .map(|c| c.as_str().to_string()),
        )
        .bind(Json(&verification.boxes))
        .bind(RequestStatus::Verified.as_str())
        .bind(Utc::now())
        .bind(id)
        .bind(expected_version)
        .bind(RequestStatus::Completed.as_str())
        .bind(RequestStatus::Cancelled.as_str())
        .execute(&self.pool)
        .await?;

        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("invoice request {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "invoice request {} changed concurrently (expected version {}, found {} in status {})",
                id, expected_version, current.version, current.status
            )));
        }

        Ok(current)
    }

    async fn add_delivery_assignment(&self, assignment: &DeliveryAssignment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO delivery_assignments (id, request_id, driver_name, scheduled_for, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&assignment.id)
        .bind(&assignment.request_id)
        .bind(&assignment.driver_name)
        .bind(assignment.scheduled_for)
        .bind(&assignment.status)
        .bind(assignment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_delivery_assignments(&self, request_id: &str) -> Result<Vec<DeliveryAssignment>> {
        let assignments = sqlx::query_as::<_, DeliveryAssignment>(
            r#"
            SELECT id, request_id, driver_name, scheduled_for, status, created_at
            FROM delivery_assignments
            WHERE request_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }
}
