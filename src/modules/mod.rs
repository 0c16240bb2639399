pub mod cancellations;
pub mod carriers;
pub mod health;
pub mod identifiers;
pub mod invoices;
pub mod pricing;
pub mod reports;
pub mod shipments;
