use std::sync::Arc;

use tracing::{info, warn};

use crate::core::error::AppError;
use crate::core::{Currency, Result};
use crate::modules::carriers::models::SyncStatus;
use crate::modules::carriers::services::CarrierSyncService;
use crate::modules::invoices::models::{GenerateInvoiceRequest, Invoice};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::pricing::models::{CalculationInput, InvoiceCalculation};
use crate::modules::pricing::services::InvoiceEngine;
use crate::modules::reports::services::ReportService;
use crate::modules::shipments::models::RequestStatus;
use crate::modules::shipments::repositories::InvoiceRequestRepository;

/// Service for invoice business logic
pub struct InvoiceService {
    requests: Arc<dyn InvoiceRequestRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    engine: Arc<InvoiceEngine>,
    carrier_sync: Arc<CarrierSyncService>,
    reports: Arc<ReportService>,
    currency: Currency,
}

impl InvoiceService {
    pub fn new(
        requests: Arc<dyn InvoiceRequestRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        engine: Arc<InvoiceEngine>,
        carrier_sync: Arc<CarrierSyncService>,
        reports: Arc<ReportService>,
        currency: Currency,
    ) -> Self {
        Self {
            requests,
            invoices,
            engine,
            carrier_sync,
            reports,
            currency,
        }
    }

    /// Price a verified request and persist its invoice.
    ///
    /// Carrier sync and the audit report run after the invoice is committed;
    /// their failures are logged and never undo the invoice.
    pub async fn generate_invoice(
        &self,
        request_id: &str,
        payload: GenerateInvoiceRequest,
    ) -> Result<Invoice> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("invoice request {}", request_id)))?;

        match request.status {
            RequestStatus::Cancelled => {
                return Err(AppError::conflict(format!(
                    "invoice request {} is cancelled",
                    request.id
                )))
            }
            RequestStatus::Completed => {
                return Err(AppError::conflict(format!(
                    "invoice request {} is already invoiced",
                    request.id
                )))
            }
            _ => {}
        }

        if let Some(expected) = payload.expected_version {
            if expected != request.version {
                return Err(AppError::conflict(format!(
                    "invoice request {} is at version {}, not {}",
                    request.id, request.version, expected
                )));
            }
        }

        let input = request.calculation_input(payload.options())?;
        let calculation = self.engine.calculate(&input)?;
        let invoice = Invoice::from_calculation(&request, calculation, self.currency);

        self.invoices
            .create_for_request(&invoice, request.version)
            .await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            route = %invoice.service_route,
            total_amount = %invoice.total_amount,
            settlement_path = ?invoice.settlement_path,
            "Invoice generated"
        );

        match self.carrier_sync.sync_invoice(&request, &invoice).await {
            Ok(record) if record.status != SyncStatus::Synced => warn!(
                invoice_id = %invoice.id,
                sync_id = %record.id,
                "Invoice issued without carrier confirmation"
            ),
            Ok(_) => {}
            Err(err) => warn!(
                invoice_id = %invoice.id,
                error = %err,
                "Failed to record carrier sync"
            ),
        }

        if let Err(err) = self.reports.record_invoice(&request, &invoice).await {
            warn!(invoice_id = %invoice.id, error = %err, "Cargo report not recorded");
        }

        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: &str) -> Result<Invoice> {
        self.invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("invoice {}", id)))
    }

    pub async fn get_invoice_for_request(&self, request_id: &str) -> Result<Invoice> {
        self.invoices
            .find_by_request_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("invoice for request {}", request_id)))
    }

    /// Run the engine without persisting anything
    pub fn quote(&self, input: &CalculationInput) -> Result<InvoiceCalculation> {
        self.engine.calculate(input)
    }
}
