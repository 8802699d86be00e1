//! Z-API delivery over a fixed endpoint/payload-shape matrix, first 2xx wins.

use std::fmt;

use log::{debug, warn};
use serde_json::{json, Map, Value};

use crate::config::ZApiConfig;
use crate::error::ProviderError;
use crate::phone;
use crate::response::{read_body, ResponseBody};
use crate::types::SendRequest;

/// Endpoint names, in the order they are tried.
pub const ENDPOINTS: [&str; 2] = ["send-text", "send-message"];

/// Payload field-name variants, in the order they are tried for each endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    PhoneMessage,
    PhoneText,
    ToMessage,
    /// `phone` without the country code.
    LocalPhoneMessage,
}

impl PayloadShape {
    pub const ALL: [PayloadShape; 4] = [
        Self::PhoneMessage,
        Self::PhoneText,
        Self::ToMessage,
        Self::LocalPhoneMessage,
    ];

    fn fields(self, request: &SendRequest) -> [(&'static str, &str); 2] {
        let number = request.phone.as_str();
        let message = request.message.as_str();
        match self {
            Self::PhoneMessage => [("phone", number), ("message", message)],
            Self::PhoneText => [("phone", number), ("text", message)],
            Self::ToMessage => [("to", number), ("message", message)],
            Self::LocalPhoneMessage => [
                ("phone", phone::strip_country_code(number)),
                ("message", message),
            ],
        }
    }

    /// Caller metadata merged with the shape's fields; the shape wins on
    /// collision.
    pub fn build(self, request: &SendRequest) -> Value {
        let mut body: Map<String, Value> = request.metadata.clone();
        for (key, value) in self.fields(request) {
            body.insert(key.to_string(), json!(value));
        }
        Value::Object(body)
    }
}

/// Outcome of one outbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAttempt {
    pub endpoint: &'static str,
    pub shape: PayloadShape,
    pub status: u16,
    pub ok: bool,
}

impl fmt::Display for DeliveryAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.endpoint, self.status)
    }
}

fn endpoint_url(config: &ZApiConfig, endpoint: &str) -> String {
    format!(
        "{}/instances/{}/token/{}/{}",
        config.base_url.trim_end_matches('/'),
        config.instance_id,
        config.instance_token,
        endpoint
    )
}

pub async fn send(
    client: &reqwest::Client,
    config: &ZApiConfig,
    request: &SendRequest,
) -> Result<ResponseBody, ProviderError> {
    let mut attempts: Vec<DeliveryAttempt> =
        Vec::with_capacity(ENDPOINTS.len() * PayloadShape::ALL.len());

    for endpoint in ENDPOINTS {
        let url = endpoint_url(config, endpoint);
        for shape in PayloadShape::ALL {
            let mut req = client.post(&url).json(&shape.build(request));
            if let Some(client_token) = &config.client_token {
                req = req.header("client-token", client_token);
            }

            let response = req.send().await?;
            let status = response.status();
            let attempt = DeliveryAttempt {
                endpoint,
                shape,
                status: status.as_u16(),
                ok: status.is_success(),
            };

            if attempt.ok {
                let body = read_body(response).await;
                debug!("Z-API accepted {:?} on {}: {:?}", attempt.shape, attempt, body);
                return Ok(body);
            }

            warn!("Z-API rejected {:?} on {}", attempt.shape, attempt);
            attempts.push(attempt);
        }
    }

    Err(ProviderError::Exhausted(
        attempts.iter().map(ToString::to_string).collect(),
    ))
}
