// Carrier platform synchronization

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CarrierShipmentPayload, CarrierSyncRecord, RetrySummary, SyncStatus};
pub use repositories::{CarrierSyncRepository, MySqlCarrierSyncRepository};
pub use services::{CarrierClient, CarrierReceipt, CarrierSyncService, HttpCarrierClient};
