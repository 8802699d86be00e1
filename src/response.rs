use log::debug;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

/// Best-effort body of an upstream response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
            Self::Empty => Value::String(String::new()),
        }
    }
}

/// Reads the body of `response`, falling back to [`ResponseBody::Empty`] on
/// any read or parse failure. Never fails.
pub async fn read_body(response: reqwest::Response) -> ResponseBody {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);

    if is_json {
        match response.json::<Value>().await {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => {
                debug!("Discarding unreadable JSON body: {}", e);
                ResponseBody::Empty
            }
        }
    } else {
        match response.text().await {
            Ok(text) if text.is_empty() => ResponseBody::Empty,
            Ok(text) => ResponseBody::Text(text),
            Err(e) => {
                debug!("Discarding unreadable body: {}", e);
                ResponseBody::Empty
            }
        }
    }
}
