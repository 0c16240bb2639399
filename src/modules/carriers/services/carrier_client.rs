use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::modules::carriers::models::CarrierShipmentPayload;

/// Acknowledgement returned by the carrier platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierReceipt {
    pub reference: String,
}

/// External carrier platform that receives issued shipments
#[async_trait]
pub trait CarrierClient: Send + Sync {
    /// Register the shipment and its invoice with the carrier
    async fn create_shipment(&self, payload: &CarrierShipmentPayload) -> Result<CarrierReceipt>;

    fn name(&self) -> &str;
}
