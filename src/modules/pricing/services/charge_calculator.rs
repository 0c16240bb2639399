use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PricingConfig;
use crate::core::{
    checked_product, checked_sum, ensure_non_negative, round_money, AppError, Result,
};
use crate::modules::pricing::models::{
    CalculationInput, ChargeBreakdown, Lane, SenderDeliveryOption, SettlementPath,
};

/// Computes shipping, pickup, delivery and insurance components
pub struct ChargeCalculator {
    free_delivery_threshold_kg: Decimal,
    default_delivery_base_amount: Decimal,
    per_box_delivery_increment: Decimal,
    vat_rate_percent: Decimal,
}

impl ChargeCalculator {
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            free_delivery_threshold_kg: config.free_delivery_threshold_kg,
            default_delivery_base_amount: config.default_delivery_base_amount,
            per_box_delivery_increment: config.per_box_delivery_increment,
            vat_rate_percent: config.vat_rate_percent,
        }
    }

    /// Price every component at `rate` per chargeable kg.
    ///
    /// Each component is rounded on its own before the base amount is summed.
    pub fn calculate(&self, input: &CalculationInput, rate: Decimal) -> Result<ChargeBreakdown> {
        if input.number_of_boxes < 1 {
            return Err(AppError::validation(
                "number_of_boxes",
                "at least one box is required",
            ));
        }
        if input.chargeable_weight < Decimal::ZERO {
            return Err(AppError::validation(
                "chargeable_weight",
                "weight cannot be negative",
            ));
        }
        ensure_non_negative("rate", rate)?;

        let shipping_charge =
            checked_product("chargeable_weight", input.chargeable_weight, rate)?;
        let pickup_charge = self.pickup_charge(input)?;

        let breakdown = match input.route.lane() {
            Lane::Outbound => {
                let path =
                    SettlementPath::from_tax_rate(input.options.tax_rate, self.vat_rate_percent)?;
                let delivery_tax_invoice = self.tax_invoice_delivery(input)?;
                let delivery_cod = self.cod_delivery(input)?;
                let delivery_charge = match path {
                    SettlementPath::CashOnDelivery => delivery_cod,
                    SettlementPath::TaxInvoice => delivery_tax_invoice,
                };

                if input.options.insurance_charge.map_or(false, |i| !i.is_zero()) {
                    debug!(route = %input.route, "Insurance is not offered outbound; ignoring supplied amount");
                }

                ChargeBreakdown {
                    rate,
                    shipping_charge,
                    pickup_charge,
                    delivery_charge,
                    insurance_charge: Decimal::ZERO,
                    base_amount: checked_sum(
                        "base_amount",
                        &[shipping_charge, pickup_charge, delivery_charge],
                    )?,
                    delivery_cod: Some(delivery_cod),
                    delivery_tax_invoice: Some(delivery_tax_invoice),
                    settlement_path: Some(path),
                }
            }
            Lane::Inbound | Lane::Other => {
                let delivery_charge = self.manual_delivery(input)?;
                let insurance_charge = match input.options.insurance_charge {
                    Some(amount) => round_money(ensure_non_negative("insurance_charge", amount)?),
                    None => Decimal::ZERO,
                };

                ChargeBreakdown {
                    rate,
                    shipping_charge,
                    pickup_charge,
                    delivery_charge,
                    insurance_charge,
                    base_amount: checked_sum(
                        "base_amount",
                        &[shipping_charge, pickup_charge, delivery_charge, insurance_charge],
                    )?,
                    delivery_cod: None,
                    delivery_tax_invoice: None,
                    settlement_path: None,
                }
            }
        };

        Ok(breakdown)
    }

    /// Tax-invoice delivery: base plus the per-box increment after the first box
    pub fn tax_invoice_delivery(&self, input: &CalculationInput) -> Result<Decimal> {
        let base = self.delivery_base(input)?;
        let extra_boxes = Decimal::from(input.number_of_boxes.saturating_sub(1));
        let increment =
            checked_product("number_of_boxes", extra_boxes, self.per_box_delivery_increment)?;
        checked_sum("delivery_base_amount", &[base, increment])
    }

    /// COD delivery: free at or above the threshold, otherwise the flat base
    pub fn cod_delivery(&self, input: &CalculationInput) -> Result<Decimal> {
        if input.chargeable_weight >= self.free_delivery_threshold_kg {
            return Ok(Decimal::ZERO);
        }
        Ok(round_money(self.delivery_base(input)?))
    }

    fn delivery_base(&self, input: &CalculationInput) -> Result<Decimal> {
        match input.options.delivery_base_amount {
            Some(amount) => ensure_non_negative("delivery_base_amount", amount),
            None => Ok(self.default_delivery_base_amount),
        }
    }

    fn manual_delivery(&self, input: &CalculationInput) -> Result<Decimal> {
        if !input.options.delivery_requested {
            return Ok(Decimal::ZERO);
        }
        match input.options.delivery_charge {
            Some(amount) => Ok(round_money(ensure_non_negative("delivery_charge", amount)?)),
            None => Ok(Decimal::ZERO),
        }
    }

    fn pickup_charge(&self, input: &CalculationInput) -> Result<Decimal> {
        match input.options.pickup_base_amount {
            Some(amount) => Ok(round_money(ensure_non_negative("pickup_base_amount", amount)?)),
            None if input.route.is_outbound()
                && input.sender_delivery_option == SenderDeliveryOption::Pickup =>
            {
                Err(AppError::validation(
                    "pickup_base_amount",
                    "pickup amount is required when the sender chose pickup",
                ))
            }
            None => Ok(Decimal::ZERO),
        }
    }
}
