use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::invoices::models::GenerateInvoiceRequest;
use crate::modules::invoices::services::InvoiceService;
use crate::modules::shipments::models::{NewInvoiceRequest, VerificationRequest};
use crate::modules::shipments::services::{ShipmentService, VerificationService};

/// One already-parsed import row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRow {
    pub request: NewInvoiceRequest,
    pub verification: VerificationRequest,
    #[serde(default)]
    pub invoice: GenerateInvoiceRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedRow {
    /// 1-based position in the batch
    pub row: usize,
    pub request_id: String,
    pub invoice_number: String,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    /// Request left behind when the row failed after it was registered
    pub request_id: Option<String>,
    pub kind: String,
    pub field: Option<String>,
    pub message: String,
}

impl RowError {
    fn new(row: usize, request_id: Option<String>, err: &AppError) -> Self {
        Self {
            row,
            request_id,
            kind: err.kind().to_string(),
            field: err.field().map(str::to_string),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: Vec<ImportedRow>,
    pub errors: Vec<RowError>,
}

/// Batch entry point running each row through the regular request,
/// verification and invoice services
pub struct BulkImportService {
    shipments: Arc<ShipmentService>,
    verification: Arc<VerificationService>,
    invoices: Arc<InvoiceService>,
}

impl BulkImportService {
    pub fn new(
        shipments: Arc<ShipmentService>,
        verification: Arc<VerificationService>,
        invoices: Arc<InvoiceService>,
    ) -> Self {
        Self {
            shipments,
            verification,
            invoices,
        }
    }

    /// Import every row; a failing row is reported and the batch continues
    pub async fn import_rows(&self, rows: Vec<ImportRow>) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for (idx, row) in rows.into_iter().enumerate() {
            let position = idx + 1;
            match self.import_row(row).await {
                Ok((request_id, invoice_number, total_amount)) => {
                    summary.imported.push(ImportedRow {
                        row: position,
                        request_id,
                        invoice_number,
                        total_amount,
                    })
                }
                Err((request_id, err)) => {
                    warn!(
                        row = position,
                        request_id = ?request_id,
                        error = %err,
                        "Import row rejected"
                    );
                    summary.errors.push(RowError::new(position, request_id, &err));
                }
            }
        }

        info!(
            imported = summary.imported.len(),
            rejected = summary.errors.len(),
            "Bulk import finished"
        );
        summary
    }

    /// On failure, returns the id of the request if it was already registered
    async fn import_row(
        &self,
        row: ImportRow,
    ) -> std::result::Result<(String, String, Decimal), (Option<String>, AppError)> {
        let created = self
            .shipments
            .create_request(row.request)
            .await
            .map_err(|err| (None, err))?;
        let request_id = created.request.id;

        let (invoice_number, total_amount) = self
            .verify_and_invoice(&request_id, created.request.version, row.verification, row.invoice)
            .await
            .map_err(|err| (Some(request_id.clone()), err))?;

        Ok((request_id, invoice_number, total_amount))
    }

    async fn verify_and_invoice(
        &self,
        request_id: &str,
        version: i64,
        mut verification: VerificationRequest,
        mut invoice_payload: GenerateInvoiceRequest,
    ) -> Result<(String, Decimal)> {
        verification.expected_version = Some(version);
        let verified = self
            .verification
            .apply_verification(request_id, verification)
            .await?;

        invoice_payload.expected_version = Some(verified.version);
        let invoice = self
            .invoices
            .generate_invoice(&verified.id, invoice_payload)
            .await?;

        Ok((invoice.invoice_number, invoice.total_amount))
    }
}
