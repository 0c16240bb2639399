use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use super::{ChargeCalculator, TaxCalculator};
use crate::config::PricingConfig;
use crate::core::{AppError, Result};
use crate::modules::pricing::models::{CalculationInput, InvoiceCalculation, RateTable};

/// Single entry point turning a verified shipment into a priced invoice.
///
/// Both direct invoice creation and bulk ingestion call `calculate`; neither
/// re-implements any pricing rule.
pub struct InvoiceEngine {
    charges: ChargeCalculator,
    taxes: TaxCalculator,
    rate_table: Arc<dyn RateTable>,
}

impl InvoiceEngine {
    pub fn new(config: &PricingConfig, rate_table: Arc<dyn RateTable>) -> Self {
        Self {
            charges: ChargeCalculator::new(config),
            taxes: TaxCalculator::new(config),
            rate_table,
        }
    }

    pub fn calculate(&self, input: &CalculationInput) -> Result<InvoiceCalculation> {
        let rate = self.resolve_rate(input)?;
        let breakdown = self.charges.calculate(input, rate)?;
        let tax = self
            .taxes
            .calculate(&input.route, input.flomic_or_personal, &breakdown)?;

        debug!(
            route = %input.route,
            chargeable_weight = %input.chargeable_weight,
            rate = %rate,
            base_amount = %tax.base_amount,
            tax_amount = %tax.tax_amount,
            total_amount = %tax.total_amount,
            "Invoice calculated"
        );

        Ok(InvoiceCalculation {
            route: input.route.clone(),
            chargeable_weight: input.chargeable_weight,
            number_of_boxes: input.number_of_boxes,
            rate,
            amount: breakdown.shipping_charge,
            pickup_charge: breakdown.pickup_charge,
            delivery_charge: breakdown.delivery_charge,
            insurance_charge: breakdown.insurance_charge,
            base_amount: tax.base_amount,
            tax_rate: tax.tax_rate,
            tax_amount: tax.tax_amount,
            total_amount: tax.total_amount,
            total_amount_cod: tax.total_amount_cod,
            total_amount_tax_invoice: tax.total_amount_tax_invoice,
            settlement_path: breakdown.settlement_path,
            tax_inclusive: tax.tax_inclusive,
        })
    }

    /// Verified special rate first, then the weight-bracket table
    pub fn resolve_rate(&self, input: &CalculationInput) -> Result<Decimal> {
        if let Some(rate) = input.special_rate {
            if rate <= Decimal::ZERO {
                return Err(AppError::validation("rate", "special rate must be greater than 0"));
            }
            return Ok(rate);
        }

        self.rate_table
            .rate_for(&input.route, input.chargeable_weight)
            .ok_or_else(|| {
                AppError::validation(
                    "rate",
                    format!(
                        "no rate configured for route {} at {} kg",
                        input.route, input.chargeable_weight
                    ),
                )
            })
    }
}
