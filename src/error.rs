use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failure of a single provider adapter.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("webhook_http_{0}")]
    WebhookStatus(u16),

    /// Every Z-API endpoint/payload combination was rejected.
    #[error("zapi_send_failed: {}", .0.join(","))]
    Exhausted(Vec<String>),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

// Drops the URL: the Z-API instance token is one of its path segments.
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// Caller-facing failure of a send request.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request body must be a JSON object: {0}")]
    InvalidPayload(String),

    #[error("phone must contain at least 12 digits including the country code")]
    InvalidPhone,

    #[error("message must not be empty")]
    InvalidMessage,

    #[error("no outbound WhatsApp provider is configured")]
    NotConfigured,

    #[error("{0}")]
    SendFailed(String),

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "invalid_payload",
            Self::InvalidPhone => "invalid_phone",
            Self::InvalidMessage => "invalid_message",
            Self::NotConfigured => "whatsapp_outbound_not_configured",
            Self::SendFailed(_) => "whatsapp_send_failed",
            Self::MethodNotAllowed => "method_not_allowed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) | Self::InvalidPhone | Self::InvalidMessage => {
                StatusCode::BAD_REQUEST
            }
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::SendFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        Self::SendFailed(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.code(),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
