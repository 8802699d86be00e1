use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GatewayError;
use crate::phone;

/// Inbound body of `POST /api/send`. `phone` wins over `to` and `message`
/// over `text`.
#[derive(Debug, Default, Deserialize)]
pub struct SendPayload {
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub to: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl SendPayload {
    pub fn raw_phone(&self) -> String {
        first_present([self.phone.as_ref(), self.to.as_ref()])
    }

    pub fn raw_message(&self) -> String {
        first_present([self.message.as_ref(), self.text.as_ref()])
    }

    pub fn metadata(&self) -> Map<String, Value> {
        match &self.metadata {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                v.to_string()
            } else if let Some(v) = n.as_i64() {
                v.to_string()
            } else {
                // Integral floats only, printed without the fraction.
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
                    _ => String::new(),
                }
            }
        }
        _ => String::new(),
    }
}

fn first_present(aliases: [Option<&Value>; 2]) -> String {
    aliases
        .into_iter()
        .flatten()
        .map(stringify)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// A validated send request: normalized phone, trimmed non-empty message.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    pub phone: String,
    pub message: String,
    pub metadata: Map<String, Value>,
}

impl SendRequest {
    pub fn validate(payload: &SendPayload) -> Result<Self, GatewayError> {
        let phone = phone::normalize(&payload.raw_phone());
        if !phone::is_valid(&phone) {
            return Err(GatewayError::InvalidPhone);
        }

        let message = payload.raw_message().trim().to_string();
        if message.is_empty() {
            return Err(GatewayError::InvalidMessage);
        }

        Ok(Self {
            phone,
            message,
            metadata: payload.metadata(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Webhook,
    Zapi,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryResult {
    pub status: &'static str,
    pub provider: ProviderKind,
    pub phone: String,
}

impl DeliveryResult {
    pub fn sent(provider: ProviderKind, phone: String) -> Self {
        Self {
            status: "sent",
            provider,
            phone,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: &'static str,
}
