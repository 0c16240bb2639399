// Invoice persistence
//
// Creating an invoice and completing its request happen in one transaction
// guarded by the request version, so invoice generation never races a
// verification update on the same request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::invoices::models::Invoice;
use crate::modules::pricing::models::ServiceRoute;
use crate::modules::shipments::models::RequestStatus;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Store `invoice` and move its request to COMPLETED.
    ///
    /// Conflict when the request version moved past `expected_version` or the
    /// request already carries an invoice.
    async fn create_for_request(&self, invoice: &Invoice, expected_version: i64) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>>;

    async fn find_by_request_id(&self, request_id: &str) -> Result<Option<Invoice>>;
}

#[derive(Debug, FromRow)]
pub(crate) struct InvoiceRow {
    pub id: String,
    pub request_id: String,
    pub invoice_number: String,
    pub tracking_code: String,
    pub client_id: String,
    pub service_route: String,
    pub currency: String,
    pub chargeable_weight: Decimal,
    pub number_of_boxes: u32,
    pub rate: Decimal,
    pub amount: Decimal,
    pub pickup_charge: Decimal,
    pub delivery_charge: Decimal,
    pub insurance_charge: Decimal,
    pub base_amount: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub total_amount_cod: Option<Decimal>,
    pub total_amount_tax_invoice: Option<Decimal>,
    pub settlement_path: Option<String>,
    pub tax_inclusive: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = AppError;

    fn try_from(row: InvoiceRow) -> Result<Self> {
        Ok(Invoice {
            id: row.id,
            request_id: row.request_id,
            invoice_number: row.invoice_number,
            tracking_code: row.tracking_code,
            client_id: row.client_id,
            service_route: ServiceRoute::parse(&row.service_route)?,
            currency: row.currency.parse().map_err(AppError::Internal)?,
            chargeable_weight: row.chargeable_weight,
            number_of_boxes: row.number_of_boxes,
            rate: row.rate,
            amount: row.amount,
            pickup_charge: row.pickup_charge,
            delivery_charge: row.delivery_charge,
            insurance_charge: row.insurance_charge,
            base_amount: row.base_amount,
            tax_rate: row.tax_rate,
            tax_amount: row.tax_amount,
            total_amount: row.total_amount,
            total_amount_cod: row.total_amount_cod,
            total_amount_tax_invoice: row.total_amount_tax_invoice,
            settlement_path: row.settlement_path.as_deref().map(str::parse).transpose()?,
            tax_inclusive: row.tax_inclusive,
            created_at: row.created_at,
        })
    }
}

pub(crate) const SELECT_INVOICE: &str = r#"
    SELECT id, request_id, invoice_number, tracking_code, client_id, service_route, currency,
           chargeable_weight, number_of_boxes, rate, amount, pickup_charge, delivery_charge,
           insurance_charge, base_amount, tax_rate, tax_amount, total_amount, total_amount_cod,
           total_amount_tax_invoice, settlement_path, tax_inclusive, created_at
    FROM invoices
"#;

/// MySQL implementation of InvoiceRepository
pub struct MySqlInvoiceRepository {
    pool: MySqlPool,
}

impl MySqlInvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn insert_with_tx(tx: &mut Transaction<'_, MySql>, invoice: &Invoice) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, request_id, invoice_number, tracking_code, client_id, service_route, currency,
                chargeable_weight, number_of_boxes, rate, amount, pickup_charge, delivery_charge,
                insurance_charge, base_amount, tax_rate, tax_amount, total_amount, total_amount_cod,
                total_amount_tax_invoice, settlement_path, tax_inclusive, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.request_id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.tracking_code)
        .bind(&invoice.client_id)
        .bind(invoice.service_route.code())
        .bind(invoice.currency.to_string())
        .bind(invoice.chargeable_weight)
        .bind(invoice.number_of_boxes)
        .bind(invoice.rate)
        .bind(invoice.amount)
        .bind(invoice.pickup_charge)
        .bind(invoice.delivery_charge)
        .bind(invoice.insurance_charge)
        .bind(invoice.base_amount)
        .bind(invoice.tax_rate)
        .bind(invoice.tax_amount)
        .bind(invoice.total_amount)
        .bind(invoice.total_amount_cod)
        .bind(invoice.total_amount_tax_invoice)
        .bind(invoice.settlement_path.map(|p| p.as_str()))
        .bind(invoice.tax_inclusive)
        .bind(invoice.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => AppError::conflict(format!(
                "invoice request {} already has an invoice",
                invoice.request_id
            )),
            _ => AppError::Database(e),
        })?;

        Ok(())
    }
}

#[async_trait]
impl InvoiceRepository for MySqlInvoiceRepository {
    async fn create_for_request(&self, invoice: &Invoice, expected_version: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let completed = sqlx::query(
            r#"
            UPDATE invoice_requests
            SET status = ?, version = version + 1, updated_at = ?
            WHERE id = ? AND version = ? AND status NOT IN (?, ?)
            "#,
        )
        .bind(RequestStatus::Completed.as_str())
        .bind(Utc::now())
        .bind(&invoice.request_id)
        .bind(expected_version)
        .bind(RequestStatus::Completed.as_str())
        .bind(RequestStatus::Cancelled.as_str())
        .execute(&mut *tx)
        .await?;

        if completed.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "invoice request {} changed since version {} or is already invoiced",
                invoice.request_id, expected_version
            )));
        }

        Self::insert_with_tx(&mut tx, invoice).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!("{} WHERE id = ?", SELECT_INVOICE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Invoice::try_from).transpose()
    }

    async fn find_by_request_id(&self, request_id: &str) -> Result<Option<Invoice>> {
        let row =
            sqlx::query_as::<_, InvoiceRow>(&format!("{} WHERE request_id = ?", SELECT_INVOICE))
                .bind(request_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Invoice::try_from).transpose()
    }
}
