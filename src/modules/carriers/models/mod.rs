mod payload;
mod sync_record;

pub use payload::{BoxDimensions, CarrierShipmentPayload, ChargeLine};
pub use sync_record::{CarrierSyncRecord, RetrySummary, SyncStatus};
