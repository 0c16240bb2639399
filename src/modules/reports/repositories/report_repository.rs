use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};

use crate::core::error::AppError;
use crate::modules::reports::models::CargoReport;

/// Storage for cargo audit reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn save(&self, report: &CargoReport) -> Result<(), AppError>;

    async fn find_by_invoice_id(&self, invoice_id: &str) -> Result<Option<CargoReport>, AppError>;
}

#[derive(Debug, FromRow)]
struct CargoReportRow {
    id: String,
    invoice_id: String,
    invoice_number: String,
    request_id: String,
    client_id: String,
    service_route: String,
    currency: String,
    base_amount: Decimal,
    tax_amount: Decimal,
    total_amount: Decimal,
    cargo_details: Json<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl From<CargoReportRow> for CargoReport {
    fn from(row: CargoReportRow) -> Self {
        CargoReport {
            id: row.id,
            invoice_id: row.invoice_id,
            invoice_number: row.invoice_number,
            request_id: row.request_id,
            client_id: row.client_id,
            service_route: row.service_route,
            currency: row.currency,
            base_amount: row.base_amount,
            tax_amount: row.tax_amount,
            total_amount: row.total_amount,
            cargo_details: row.cargo_details.0,
            created_at: row.created_at,
        }
    }
}

pub struct MySqlReportRepository {
    pool: MySqlPool,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn save(&self, report: &CargoReport) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO cargo_reports (
                id, invoice_id, invoice_number, request_id, client_id, service_route, currency,
                base_amount, tax_amount, total_amount, cargo_details, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&report.id)
        .bind(&report.invoice_id)
        .bind(&report.invoice_number)
        .bind(&report.request_id)
        .bind(&report.client_id)
        .bind(&report.service_route)
        .bind(&report.currency)
        .bind(report.base_amount)
        .bind(report.tax_amount)
        .bind(report.total_amount)
        .bind(Json(&report.cargo_details))
        .bind(report.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_invoice_id(&self, invoice_id: &str) -> Result<Option<CargoReport>, AppError> {
        let row = sqlx::query_as::<_, CargoReportRow>(
            r#"
            SELECT id, invoice_id, invoice_number, request_id, client_id, service_route, currency,
                   base_amount, tax_amount, total_amount, cargo_details, created_at
            FROM cargo_reports
            WHERE invoice_id = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CargoReport::from))
    }
}
