mod delivery;
mod invoice_request;
mod verification;

pub use delivery::{BookingEvent, DeliveryAssignment};
pub use invoice_request::{InvoiceRequest, InvoiceRequestCreated, NewInvoiceRequest, RequestStatus};
pub use verification::{BoxDetail, ShipmentVerification, VerificationRequest};
