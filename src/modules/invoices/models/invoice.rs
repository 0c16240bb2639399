// Invoice: the immutable priced snapshot of a verified invoice request
//
// Every monetary field is copied from the engine's InvoiceCalculation when
// the invoice is generated and never recomputed afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Currency;
use crate::modules::pricing::models::{InvoiceCalculation, InvoiceOptions, ServiceRoute, SettlementPath};
use crate::modules::shipments::models::InvoiceRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub request_id: String,
    pub invoice_number: String,
    pub tracking_code: String,
    pub client_id: String,
    pub service_route: ServiceRoute,
    pub currency: Currency,
    pub chargeable_weight: Decimal,
    pub number_of_boxes: u32,
    pub rate: Decimal,
    /// Shipping charge only
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
    pub settlement_path: Option<SettlementPath>,
    /// Tax was extracted from an amount that already included it
    pub tax_inclusive: bool,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn from_calculation(
        request: &InvoiceRequest,
        calculation: InvoiceCalculation,
        currency: Currency,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            request_id: request.id.clone(),
            invoice_number: request.invoice_number.clone(),
            tracking_code: request.tracking_code.clone(),
            client_id: request.client_id.clone(),
            service_route: calculation.route,
            currency,
            chargeable_weight: calculation.chargeable_weight,
            number_of_boxes: calculation.number_of_boxes,
            rate: calculation.rate,
            amount: calculation.amount,
            pickup_charge: calculation.pickup_charge,
            delivery_charge: calculation.delivery_charge,
            insurance_charge: calculation.insurance_charge,
            base_amount: calculation.base_amount,
            tax_rate: calculation.tax_rate,
            tax_amount: calculation.tax_amount,
            total_amount: calculation.total_amount,
            total_amount_cod: calculation.total_amount_cod,
            total_amount_tax_invoice: calculation.total_amount_tax_invoice,
            settlement_path: calculation.settlement_path,
            tax_inclusive: calculation.tax_inclusive,
            created_at: Utc::now(),
        }
    }
}

/// Finance input for generating an invoice from a verified request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateInvoiceRequest {
    /// Version of the invoice request the caller read
    #[serde(default)]
    pub expected_version: Option<i64>,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub pickup_base_amount: Option<Decimal>,
    #[serde(default)]
    pub delivery_base_amount: Option<Decimal>,
    #[serde(default)]
    pub delivery_requested: bool,
    #[serde(default)]
    pub delivery_charge: Option<Decimal>,
    #[serde(default)]
    pub insurance_charge: Option<Decimal>,
}

impl GenerateInvoiceRequest {
    pub fn options(&self) -> InvoiceOptions {
        InvoiceOptions {
            tax_rate: self.tax_rate,
            pickup_base_amount: self.pickup_base_amount,
            delivery_base_amount: self.delivery_base_amount,
            delivery_requested: self.delivery_requested,
            delivery_charge: self.delivery_charge,
            insurance_charge: self.insurance_charge,
        }
    }
}
