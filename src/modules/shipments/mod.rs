// Invoice requests, verification and delivery assignments

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{InvoiceRequest, NewInvoiceRequest, RequestStatus, ShipmentVerification, VerificationRequest};
pub use repositories::{InvoiceRequestRepository, MySqlInvoiceRequestRepository};
pub use services::{ShipmentService, VerificationService};
