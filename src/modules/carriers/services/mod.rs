pub mod carrier_client;
pub mod http_carrier;
pub mod sync_service;

pub use carrier_client::{CarrierClient, CarrierReceipt};
pub use http_carrier::HttpCarrierClient;
pub use sync_service::CarrierSyncService;
