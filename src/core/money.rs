use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::AppError;

/// Scale applied to every monetary amount
pub const MONEY_SCALE: u32 = 2;

/// Rounds a monetary amount to two decimal places, half-up.
///
/// Every intermediate step of the invoice engine goes through this function so
/// that component sums never accumulate sub-cent drift.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rejects a negative caller-supplied amount, naming the field
pub fn ensure_non_negative(field: &str, amount: Decimal) -> Result<Decimal, AppError> {
    if amount < Decimal::ZERO {
        return Err(AppError::validation(field, "amount cannot be negative"));
    }
    Ok(amount)
}

/// `a × b` rounded to money scale; overflow is a validation error on `field`
pub fn checked_product(field: &str, a: Decimal, b: Decimal) -> Result<Decimal, AppError> {
    a.checked_mul(b)
        .map(round_money)
        .ok_or_else(|| AppError::validation(field, "amount out of range"))
}

/// Sum of already rounded components; overflow is a validation error on `field`
pub fn checked_sum(field: &str, amounts: &[Decimal]) -> Result<Decimal, AppError> {
    amounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(*amount))
        .map(round_money)
        .ok_or_else(|| AppError::validation(field, "amount out of range"))
}

/// Billing currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// UAE Dirham
    AED,
    /// Philippine Peso
    PHP,
}

impl Default for Currency {
    fn default() -> Self {
        Currency::AED
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::AED => write!(f, "AED"),
            Currency::PHP => write!(f, "PHP"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AED" => Ok(Currency::AED),
            "PHP" => Ok(Currency::PHP),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
