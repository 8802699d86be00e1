use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, ProviderConfig};
use crate::error::GatewayError;
use crate::providers::{webhook, zapi};
use crate::types::{DeliveryResult, ProviderKind, SendPayload, SendRequest};

/// Routes each send request to the single configured provider.
pub struct Dispatcher {
    client: reqwest::Client,
    provider: ProviderConfig,
}

impl Dispatcher {
    pub fn new(client: reqwest::Client, provider: ProviderConfig) -> Self {
        Self { client, provider }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?, config.provider.clone()))
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Validates `payload` and hands it to the configured provider exactly
    /// once. There is no fallback between providers.
    pub async fn dispatch(&self, payload: &SendPayload) -> Result<DeliveryResult, GatewayError> {
        let request = SendRequest::validate(payload)?;
        let request_id = Uuid::new_v4();

        let (kind, outcome) = match &self.provider {
            ProviderConfig::Webhook(config) => {
                info!("[{}] Sending to {} via webhook", request_id, request.phone);
                (
                    ProviderKind::Webhook,
                    webhook::send(&self.client, config, &request).await,
                )
            }
            ProviderConfig::ZApi(config) => {
                info!("[{}] Sending to {} via Z-API", request_id, request.phone);
                (
                    ProviderKind::Zapi,
                    zapi::send(&self.client, config, &request).await,
                )
            }
            ProviderConfig::None => {
                warn!("[{}] No outbound provider configured", request_id);
                return Err(GatewayError::NotConfigured);
            }
        };

        match outcome {
            Ok(body) => {
                info!("[{}] Message to {} sent", request_id, request.phone);
                debug!("[{}] Provider response: {}", request_id, body.into_value());
                Ok(DeliveryResult::sent(kind, request.phone))
            }
            Err(e) => {
                warn!("[{}] Message to {} failed: {}", request_id, request.phone, e);
                Err(e.into())
            }
        }
    }
}
