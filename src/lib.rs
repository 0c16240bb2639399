//! Freight invoice calculation service
//!
//! Shipment intake, operations verification, invoice pricing with
//! route-specific tax and delivery rules, atomic cancellation and carrier
//! synchronization.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

pub use modules::cancellations;
pub use modules::invoices;
pub use modules::pricing;
pub use modules::shipments;
