mod calculation;
mod classification;
mod rate_table;
mod route;
mod weight;

pub use calculation::{
    CalculationInput, ChargeBreakdown, InvoiceCalculation, InvoiceOptions, SenderDeliveryOption,
    SettlementPath, TaxOutcome,
};
pub use classification::Classification;
pub use rate_table::{BracketRateTable, RateBracket, RateTable};
pub use route::{Lane, ServiceRoute};
pub use weight::{ResolvedWeight, WeightBasis};
