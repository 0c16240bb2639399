// Invoice financial calculation engine

pub mod models;
pub mod services;

pub use models::{
    BracketRateTable, CalculationInput, Classification, InvoiceCalculation, InvoiceOptions, Lane,
    RateTable, SenderDeliveryOption, ServiceRoute, SettlementPath, WeightBasis,
};
pub use services::{ClassificationResolver, InvoiceEngine, TaxCalculator, WeightResolver};
