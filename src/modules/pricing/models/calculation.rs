// Invoice calculation inputs and outputs
//
// An InvoiceCalculation is the immutable priced snapshot produced by the
// engine; the invoice service copies it verbatim into the Invoice record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::route::ServiceRoute;
use crate::core::{AppError, Result};

/// Sender's choice for handing over cargo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderDeliveryOption {
    /// Cargo is collected from the sender; a pickup amount is mandatory outbound
    Pickup,
    /// Sender brings the cargo to the branch
    #[default]
    DropOff,
}

impl SenderDeliveryOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderDeliveryOption::Pickup => "pickup",
            SenderDeliveryOption::DropOff => "drop_off",
        }
    }
}

impl std::str::FromStr for SenderDeliveryOption {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pickup" => Ok(SenderDeliveryOption::Pickup),
            "drop_off" | "dropoff" => Ok(SenderDeliveryOption::DropOff),
            other => Err(AppError::validation(
                "sender_delivery_option",
                format!("unknown sender delivery option: {}", other),
            )),
        }
    }
}

/// The two settlement paths of an outbound shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementPath {
    /// Tax rate 0
    CashOnDelivery,
    /// Tax rate equal to the configured VAT rate
    TaxInvoice,
}

impl SettlementPath {
    /// Select the path from a requested tax rate; absent means cash-on-delivery
    pub fn from_tax_rate(tax_rate: Option<Decimal>, vat_rate_percent: Decimal) -> Result<Self> {
        match tax_rate {
            None => Ok(SettlementPath::CashOnDelivery),
            Some(rate) if rate.is_zero() => Ok(SettlementPath::CashOnDelivery),
            Some(rate) if rate == vat_rate_percent => Ok(SettlementPath::TaxInvoice),
            Some(rate) => Err(AppError::validation(
                "tax_rate",
                format!("tax rate must be 0 or {}, got {}", vat_rate_percent, rate),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementPath::CashOnDelivery => "cash_on_delivery",
            SettlementPath::TaxInvoice => "tax_invoice",
        }
    }

    pub fn tax_rate(&self, vat_rate_percent: Decimal) -> Decimal {
        match self {
            SettlementPath::CashOnDelivery => Decimal::ZERO,
            SettlementPath::TaxInvoice => vat_rate_percent,
        }
    }
}

impl std::str::FromStr for SettlementPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash_on_delivery" => Ok(SettlementPath::CashOnDelivery),
            "tax_invoice" => Ok(SettlementPath::TaxInvoice),
            other => Err(AppError::internal(format!(
                "unknown settlement path: {}",
                other
            ))),
        }
    }
}

/// Finance-side choices supplied when an invoice is generated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceOptions {
    /// Requested tax rate in percent (outbound: 0 or the VAT rate)
    pub tax_rate: Option<Decimal>,
    pub pickup_base_amount: Option<Decimal>,
    /// Outbound delivery base; the configured default applies when absent
    pub delivery_base_amount: Option<Decimal>,
    /// Non-outbound routes: whether a delivery leg was requested
    pub delivery_requested: bool,
    /// Non-outbound routes: manually supplied delivery charge
    pub delivery_charge: Option<Decimal>,
    /// Non-outbound routes: explicitly supplied insurance charge
    pub insurance_charge: Option<Decimal>,
}

/// Everything the engine reads for one invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub route: ServiceRoute,
    pub chargeable_weight: Decimal,
    pub number_of_boxes: u32,
    /// A verified special rate; overrides the rate table
    #[serde(default)]
    pub special_rate: Option<Decimal>,
    #[serde(default)]
    pub flomic_or_personal: bool,
    #[serde(default)]
    pub sender_delivery_option: SenderDeliveryOption,
    #[serde(default)]
    pub options: InvoiceOptions,
}

/// Individually rounded charge components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub rate: Decimal,
    pub shipping_charge: Decimal,
    pub pickup_charge: Decimal,
    /// Delivery for the selected settlement path (or the manual amount)
    pub delivery_charge: Decimal,
    pub insurance_charge: Decimal,
    /// shipping + pickup + delivery + insurance
    pub base_amount: Decimal,
    /// Outbound only: COD-formula delivery
    pub delivery_cod: Option<Decimal>,
    /// Outbound only: tax-invoice-formula delivery
    pub delivery_tax_invoice: Option<Decimal>,
    pub settlement_path: Option<SettlementPath>,
}

/// Tax and totals derived from a charge breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxOutcome {
    /// Stored base amount; the extracted subtotal for value-inclusive tax
    pub base_amount: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub total_amount_cod: Option<Decimal>,
    pub total_amount_tax_invoice: Option<Decimal>,
    pub tax_inclusive: bool,
}

/// Priced invoice snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCalculation {
    pub route: ServiceRoute,
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
    pub tax_inclusive: bool,
}
