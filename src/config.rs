//! Process configuration, read from the environment once at startup.

use std::time::Duration;

use log::warn;
use serde_json::{Map, Value};

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_AUTH_HEADER: &str = "authorization";
pub const DEFAULT_ZAPI_BASE_URL: &str = "https://api.z-api.io";

#[derive(Debug, Clone, PartialEq)]
pub struct WebhookConfig {
    pub url: String,
    pub token: Option<String>,
    pub auth_header: String,
    /// Operator-supplied fields merged into every webhook body.
    pub extra_fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZApiConfig {
    pub base_url: String,
    pub instance_id: String,
    pub instance_token: String,
    pub client_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    Webhook(WebhookConfig),
    ZApi(ZApiConfig),
    None,
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Webhook(_) => "webhook",
            Self::ZApi(_) => "zapi",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Deadline for each outbound attempt; `None` disables it.
    pub http_timeout: Option<Duration>,
    pub provider: ProviderConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = var("GATEWAY_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let timeout_ms = var("WHATSAPP_HTTP_TIMEOUT_MS")
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_MS);
        let http_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

        let provider = if let Some(url) = var("WHATSAPP_WEBHOOK_URL") {
            ProviderConfig::Webhook(WebhookConfig {
                url,
                token: var("WHATSAPP_WEBHOOK_TOKEN"),
                auth_header: var("WHATSAPP_WEBHOOK_AUTH_HEADER")
                    .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string()),
                extra_fields: parse_extra_fields(var("WHATSAPP_WEBHOOK_EXTRA_JSON").as_deref()),
            })
        } else if let (Some(instance_id), Some(instance_token)) =
            (var("ZAPI_INSTANCE_ID"), var("ZAPI_INSTANCE_TOKEN"))
        {
            ProviderConfig::ZApi(ZApiConfig {
                base_url: var("ZAPI_BASE_URL").unwrap_or_else(|| DEFAULT_ZAPI_BASE_URL.to_string()),
                instance_id,
                instance_token,
                client_token: var("ZAPI_CLIENT_TOKEN"),
            })
        } else {
            ProviderConfig::None
        };

        Self {
            port,
            http_timeout,
            provider,
        }
    }
}

/// Parses the extra webhook fields. Anything other than a JSON object is
/// ignored.
fn parse_extra_fields(raw: Option<&str>) -> Map<String, Value> {
    let Some(raw) = raw else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("WHATSAPP_WEBHOOK_EXTRA_JSON is not a JSON object, ignoring it");
            Map::new()
        }
        Err(e) => {
            warn!("WHATSAPP_WEBHOOK_EXTRA_JSON is malformed, ignoring it: {}", e);
            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_provider() {
        let cfg = config(&[]);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.http_timeout, Some(Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS)));
        assert_eq!(cfg.provider, ProviderConfig::None);
    }

    #[test]
    fn webhook_wins_over_zapi() {
        let cfg = config(&[
            ("WHATSAPP_WEBHOOK_URL", "https://hooks.example.com/wa"),
            ("ZAPI_INSTANCE_ID", "inst"),
            ("ZAPI_INSTANCE_TOKEN", "tok"),
        ]);
        assert_eq!(cfg.provider.name(), "webhook");
    }

    #[test]
    fn webhook_defaults() {
        let cfg = config(&[("WHATSAPP_WEBHOOK_URL", "https://hooks.example.com/wa")]);
        let ProviderConfig::Webhook(webhook) = cfg.provider else {
            panic!("expected webhook provider");
        };
        assert_eq!(webhook.token, None);
        assert_eq!(webhook.auth_header, "authorization");
        assert!(webhook.extra_fields.is_empty());
    }

    #[test]
    fn zapi_requires_id_and_token() {
        let cfg = config(&[("ZAPI_INSTANCE_ID", "inst")]);
        assert_eq!(cfg.provider, ProviderConfig::None);

        let cfg = config(&[
            ("ZAPI_INSTANCE_ID", "inst"),
            ("ZAPI_INSTANCE_TOKEN", "tok"),
            ("ZAPI_CLIENT_TOKEN", "client"),
        ]);
        assert_eq!(
            cfg.provider,
            ProviderConfig::ZApi(ZApiConfig {
                base_url: DEFAULT_ZAPI_BASE_URL.to_string(),
                instance_id: "inst".to_string(),
                instance_token: "tok".to_string(),
                client_token: Some("client".to_string()),
            })
        );
    }

    #[test]
    fn blank_values_are_unset() {
        let cfg = config(&[
            ("WHATSAPP_WEBHOOK_URL", "   "),
            ("ZAPI_INSTANCE_ID", "inst"),
            ("ZAPI_INSTANCE_TOKEN", "tok"),
            ("ZAPI_CLIENT_TOKEN", ""),
        ]);
        let ProviderConfig::ZApi(zapi) = cfg.provider else {
            panic!("expected zapi provider");
        };
        assert_eq!(zapi.client_token, None);
    }

    #[test]
    fn extra_fields_tolerate_bad_json() {
        assert!(parse_extra_fields(Some("{oops")).is_empty());
        assert!(parse_extra_fields(Some("[1,2]")).is_empty());
        let fields = parse_extra_fields(Some(r#"{"channel":"crm"}"#));
        assert_eq!(fields.get("channel"), Some(&json!("crm")));
    }

    #[test]
    fn timeout_zero_disables_deadline() {
        let cfg = config(&[("WHATSAPP_HTTP_TIMEOUT_MS", "0"), ("GATEWAY_PORT", "9000")]);
        assert_eq!(cfg.http_timeout, None);
        assert_eq!(cfg.port, 9000);
    }
}
