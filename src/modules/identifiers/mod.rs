// Invoice number and tracking code issuance

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{IdentifierKind, TrackingAssignment};
pub use repositories::{IdentifierRegistry, MySqlIdentifierRegistry};
pub use services::{CandidateSource, IdentifierGenerator, RandomCandidates};
