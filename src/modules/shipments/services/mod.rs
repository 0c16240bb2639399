pub mod shipment_service;
pub mod verification_service;

pub use shipment_service::{NewDeliveryAssignment, ShipmentService};
pub use verification_service::VerificationService;
