use rust_decimal::Decimal;

use crate::config::PricingConfig;
use crate::core::error::AppError;
use crate::core::{checked_product, checked_sum, round_money};
use crate::modules::pricing::models::{ChargeBreakdown, Lane, ServiceRoute, SettlementPath, TaxOutcome};

/// TaxCalculator applies the VAT rule for a route and produces the invoice totals
pub struct TaxCalculator {
    vat_rate_percent: Decimal,
}

impl TaxCalculator {
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            vat_rate_percent: config.vat_rate_percent,
        }
    }

    /// Calculate tax and totals.
    ///
    /// Rules, first match wins:
    /// 1. inbound FLOMIC/PERSONAL: the base already includes VAT
    /// 2. outbound: VAT on the delivery leg only, both totals computed
    /// 3. everything else: untaxed
    pub fn calculate(
        &self,
        route: &ServiceRoute,
        flomic_or_personal: bool,
        breakdown: &ChargeBreakdown,
    ) -> Result<TaxOutcome, AppError> {
        self.validate_tax_rate(self.vat_rate_percent)?;

        if route.lane() == Lane::Inbound && flomic_or_personal {
            let (subtotal, tax_amount) = self.extract_inclusive_tax(breakdown.base_amount);
            return Ok(TaxOutcome {
                base_amount: subtotal,
                tax_rate: self.vat_rate_percent,
                tax_amount,
                total_amount: round_money(breakdown.base_amount),
                total_amount_cod: None,
                total_amount_tax_invoice: None,
                tax_inclusive: true,
            });
        }

        if route.lane() == Lane::Outbound {
            return self.outbound_totals(breakdown);
        }

        Ok(TaxOutcome {
            base_amount: breakdown.base_amount,
            tax_rate: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: breakdown.base_amount,
            total_amount_cod: None,
            total_amount_tax_invoice: None,
            tax_inclusive: false,
        })
    }

    /// Split a VAT-inclusive amount into (subtotal, tax)
    ///
    /// subtotal = amount / (1 + rate), tax = subtotal × rate, each rounded
    pub fn extract_inclusive_tax(&self, amount: Decimal) -> (Decimal, Decimal) {
        let fraction = self.vat_fraction();
        let subtotal = round_money(amount / (Decimal::ONE + fraction));
        let tax = round_money(subtotal * fraction);
        (subtotal, tax)
    }

    /// Calculate exclusive tax on an amount at the configured VAT rate
    pub fn calculate_tax(&self, amount: Decimal) -> Result<Decimal, AppError> {
        checked_product("tax_amount", amount, self.vat_fraction())
    }

    /// Validate a tax rate percentage: 0..=100 with at most 2 decimal places
    pub fn validate_tax_rate(&self, tax_rate_percent: Decimal) -> Result<(), AppError> {
        if tax_rate_percent < Decimal::ZERO {
            return Err(AppError::validation("tax_rate", "Tax rate cannot be negative"));
        }

        if tax_rate_percent > Decimal::ONE_HUNDRED {
            return Err(AppError::validation(
                "tax_rate",
                "Tax rate cannot exceed 100%",
            ));
        }

        if tax_rate_percent.normalize().scale() > 2 {
            return Err(AppError::validation(
                "tax_rate",
                "Tax rate cannot have more than 2 decimal places",
            ));
        }

        Ok(())
    }

    fn outbound_totals(&self, breakdown: &ChargeBreakdown) -> Result<TaxOutcome, AppError> {
        let (delivery_cod, delivery_tax_invoice, path) = match (
            breakdown.delivery_cod,
            breakdown.delivery_tax_invoice,
            breakdown.settlement_path,
        ) {
            (Some(cod), Some(tax_invoice), Some(path)) => (cod, tax_invoice, path),
            _ => {
                return Err(AppError::internal(
                    "outbound breakdown is missing its settlement components",
                ))
            }
        };

        let delivery_tax = self.calculate_tax(delivery_tax_invoice)?;
        let total_amount_cod = checked_sum(
            "total_amount_cod",
            &[breakdown.shipping_charge, breakdown.pickup_charge, delivery_cod],
        )?;
        // Delivery-leg document only; shipping is settled on the COD side
        let total_amount_tax_invoice =
            checked_sum("total_amount_tax_invoice", &[delivery_tax_invoice, delivery_tax])?;

        let (tax_amount, total_amount) = match path {
            SettlementPath::CashOnDelivery => (Decimal::ZERO, total_amount_cod),
            SettlementPath::TaxInvoice => (delivery_tax, total_amount_tax_invoice),
        };

        Ok(TaxOutcome {
            base_amount: breakdown.base_amount,
            tax_rate: path.tax_rate(self.vat_rate_percent),
            tax_amount,
            total_amount,
            total_amount_cod: Some(total_amount_cod),
            total_amount_tax_invoice: Some(total_amount_tax_invoice),
            tax_inclusive: false,
        })
    }

    fn vat_fraction(&self) -> Decimal {
        self.vat_rate_percent / Decimal::ONE_HUNDRED
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new(&PricingConfig::default())
    }
}
