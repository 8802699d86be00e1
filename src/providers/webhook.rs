use log::debug;
use serde_json::{json, Map, Value};

use crate::config::WebhookConfig;
use crate::error::ProviderError;
use crate::response::{read_body, ResponseBody};
use crate::types::SendRequest;

fn build_body(config: &WebhookConfig, request: &SendRequest) -> Value {
    let mut body: Map<String, Value> = config.extra_fields.clone();
    body.insert("phone".into(), json!(request.phone));
    body.insert("to".into(), json!(request.phone));
    body.insert("message".into(), json!(request.message));
    body.insert("text".into(), json!(request.message));
    body.insert("metadata".into(), Value::Object(request.metadata.clone()));
    Value::Object(body)
}

/// Delivers `request` to the operator's webhook with a single POST. Any
/// non-2xx status is final.
pub async fn send(
    client: &reqwest::Client,
    config: &WebhookConfig,
    request: &SendRequest,
) -> Result<ResponseBody, ProviderError> {
    let mut req = client.post(&config.url).json(&build_body(config, request));

    if let Some(token) = &config.token {
        let value = if config.auth_header.eq_ignore_ascii_case("authorization") {
            format!("Bearer {}", token)
        } else {
            token.clone()
        };
        req = req.header(config.auth_header.as_str(), value);
    }

    let response = req.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::WebhookStatus(status.as_u16()));
    }

    let body = read_body(response).await;
    debug!("Webhook accepted message ({}): {:?}", status, body);
    Ok(body)
}
