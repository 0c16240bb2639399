// Atomic cancellation of invoice requests

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CancelRequest, CancellationRecord, CancellationState};
pub use repositories::{CancellationStore, CancellationUnit, MySqlCancellationStore};
pub use services::CancellationService;
