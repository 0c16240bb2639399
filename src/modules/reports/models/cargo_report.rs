use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::invoices::models::Invoice;
use crate::modules::shipments::models::InvoiceRequest;

/// Audit snapshot of the cargo behind an issued invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoReport {
    pub id: String,
    pub invoice_id: String,
    pub invoice_number: String,
    pub request_id: String,
    pub client_id: String,
    pub service_route: String,
    pub currency: String,
    pub base_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    /// Verification snapshot and boxes as they were at invoicing time
    pub cargo_details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl CargoReport {
    pub fn from_invoice(request: &InvoiceRequest, invoice: &Invoice) -> Self {
        let cargo_details = serde_json::json!({
            "tracking_code": request.tracking_code,
            "shipment_classification": request.shipment_classification,
            "insured": request.insured,
            "declared_value": request.declared_value,
            "boxes": request.boxes,
            "verification": request.verification,
            "chargeable_weight": invoice.chargeable_weight,
            "number_of_boxes": invoice.number_of_boxes,
            "rate": invoice.rate,
        });

        Self {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice.id.clone(),
            invoice_number: invoice.invoice_number.clone(),
            request_id: request.id.clone(),
            client_id: invoice.client_id.clone(),
            service_route: invoice.service_route.code().to_string(),
            currency: invoice.currency.to_string(),
            base_amount: invoice.base_amount,
            tax_amount: invoice.tax_amount,
            total_amount: invoice.total_amount,
            cargo_details,
            created_at: Utc::now(),
        }
    }
}
