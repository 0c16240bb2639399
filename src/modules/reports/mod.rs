// Cargo audit reports

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::CargoReport;
pub use repositories::{MySqlReportRepository, ReportRepository};
pub use services::ReportService;
