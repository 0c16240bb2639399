pub mod charge_calculator;
pub mod engine;
pub mod route_resolver;
pub mod tax_calculator;
pub mod weight_resolver;

pub use charge_calculator::ChargeCalculator;
pub use engine::InvoiceEngine;
pub use route_resolver::{ClassificationResolver, ResolvedClassification};
pub use tax_calculator::TaxCalculator;
pub use weight_resolver::{WeightInput, WeightResolver};
