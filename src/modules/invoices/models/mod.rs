mod invoice;

pub use invoice::{GenerateInvoiceRequest, Invoice};
