use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::invoices::models::Invoice;
use crate::modules::reports::models::CargoReport;
use crate::modules::reports::repositories::ReportRepository;
use crate::modules::shipments::models::InvoiceRequest;

/// Writes and reads cargo audit reports
pub struct ReportService {
    report_repo: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(report_repo: Arc<dyn ReportRepository>) -> Self {
        Self { report_repo }
    }

    /// Store the cargo snapshot for an issued invoice.
    ///
    /// Storage failures come back as collaborator errors; callers log them.
    pub async fn record_invoice(
        &self,
        request: &InvoiceRequest,
        invoice: &Invoice,
    ) -> Result<CargoReport> {
        let report = CargoReport::from_invoice(request, invoice);
        self.report_repo
            .save(&report)
            .await
            .map_err(|e| AppError::collaborator(format!("audit report write failed: {}", e)))?;

        info!(
            invoice_number = %report.invoice_number,
            total_amount = %report.total_amount,
            "Cargo report recorded"
        );
        Ok(report)
    }

    pub async fn get_for_invoice(&self, invoice_id: &str) -> Result<CargoReport> {
        self.report_repo
            .find_by_invoice_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("cargo report for invoice {}", invoice_id)))
    }
}
