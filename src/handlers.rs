use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::info;
use serde_json::Value;

use crate::dispatcher::Dispatcher;
use crate::error::GatewayError;
use crate::types::{HealthResponse, SendPayload};

pub struct AppState {
    pub dispatcher: Dispatcher,
}

fn parse_payload(body: &[u8]) -> Result<SendPayload, GatewayError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| GatewayError::InvalidPayload(e.to_string()))?;
    if !value.is_object() {
        return Err(GatewayError::InvalidPayload("expected an object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| GatewayError::InvalidPayload(e.to_string()))
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, GatewayError> {
    let payload = parse_payload(&body)?;
    info!(
        "Send request for {} via {}",
        payload.raw_phone(),
        state.dispatcher.provider().name()
    );

    let result = state.dispatcher.dispatch(&payload).await?;
    Ok((StatusCode::OK, Json(result)))
}

pub async fn preflight() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: state.dispatcher.provider().name(),
    })
}
