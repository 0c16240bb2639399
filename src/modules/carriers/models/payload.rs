use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::invoices::models::Invoice;
use crate::modules::shipments::models::InvoiceRequest;

/// One box's measurements as the carrier expects them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub length_cm: Option<Decimal>,
    pub width_cm: Option<Decimal>,
    pub height_cm: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
    pub classification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeLine {
    pub code: String,
    pub amount: Decimal,
}

/// Flattened shipment and invoice data sent to the carrier platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierShipmentPayload {
    pub awb: String,
    pub invoice_number: String,
    pub client_id: String,
    pub service_route: String,
    pub currency: String,
    pub actual_weight: Option<Decimal>,
    pub volumetric_weight: Option<Decimal>,
    pub chargeable_weight: Decimal,
    pub number_of_boxes: u32,
    pub dimensions: Vec<BoxDimensions>,
    pub charges: Vec<ChargeLine>,
    pub base_amount: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub total_amount_cod: Option<Decimal>,
    pub total_amount_tax_invoice: Option<Decimal>,
}

impl CarrierShipmentPayload {
    pub fn build(request: &InvoiceRequest, invoice: &Invoice) -> Self {
        let verification = request.verification.as_ref();
        let boxes = verification.map_or(&request.boxes, |v| &v.boxes);

        // Zero components are left out of the charges array
        let charges = [
            ("SHIPPING", invoice.amount),
            ("PICKUP", invoice.pickup_charge),
            ("DELIVERY", invoice.delivery_charge),
            ("INSURANCE", invoice.insurance_charge),
        ]
        .into_iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(code, amount)| ChargeLine {
            code: code.to_string(),
            amount,
        })
        .collect();

        Self {
            awb: invoice.tracking_code.clone(),
            invoice_number: invoice.invoice_number.clone(),
            client_id: invoice.client_id.clone(),
            service_route: invoice.service_route.code().to_string(),
            currency: invoice.currency.to_string(),
            actual_weight: verification.map(|v| v.actual_weight),
            volumetric_weight: verification.map(|v| v.volumetric_weight),
            chargeable_weight: invoice.chargeable_weight,
            number_of_boxes: invoice.number_of_boxes,
            dimensions: boxes
                .iter()
                .map(|b| BoxDimensions {
                    length_cm: b.length_cm,
                    width_cm: b.width_cm,
                    height_cm: b.height_cm,
                    weight_kg: b.weight_kg,
                    classification: b.classification.as_ref().map(|c| c.to_string()),
                })
                .collect(),
            charges,
            base_amount: invoice.base_amount,
            tax_rate: invoice.tax_rate,
            tax_amount: invoice.tax_amount,
            total_amount: invoice.total_amount,
            total_amount_cod: invoice.total_amount_cod,
            total_amount_tax_invoice: invoice.total_amount_tax_invoice,
        }
    }
}
