use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde::Deserialize;
use tracing::debug;

use super::carrier_client::{CarrierClient, CarrierReceipt};
use crate::config::CarrierConfig;
use crate::core::{AppError, Result};
use crate::modules::carriers::models::CarrierShipmentPayload;

/// Carrier REST client; transient failures are retried with exponential backoff
pub struct HttpCarrierClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl HttpCarrierClient {
    pub fn new(config: &CarrierConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build carrier client: {}", e)))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl CarrierClient for HttpCarrierClient {
    async fn create_shipment(&self, payload: &CarrierShipmentPayload) -> Result<CarrierReceipt> {
        let url = format!("{}/shipments", self.base_url);

        #[derive(Deserialize)]
        struct ShipmentResponse {
            id: String,
        }

        debug!(awb = %payload.awb, url = %url, "Sending shipment to carrier");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::collaborator(format!("Carrier API error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::collaborator(format!(
                "Carrier API error {}: {}",
                status, body
            )));
        }

        let created: ShipmentResponse = response
            .json()
            .await
            .map_err(|e| AppError::collaborator(format!("Failed to parse carrier response: {}", e)))?;

        Ok(CarrierReceipt {
            reference: created.id,
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
