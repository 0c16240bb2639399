// Invoices module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{GenerateInvoiceRequest, Invoice};
pub use repositories::{InvoiceRepository, MySqlInvoiceRepository};
pub use services::{BulkImportService, InvoiceService};
