//! In-process upstream used by the provider and router tests.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Json;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct MockUpstream {
    pub base_url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    server: JoinHandle<()>,
}

impl MockUpstream {
    /// Starts a server on a random local port that records every request and
    /// answers with whatever `respond` returns for it.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&RecordedCall) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream addr");

        let calls: Arc<Mutex<Vec<RecordedCall>>> = Arc::default();
        let respond = Arc::new(respond);

        let app = Router::new().fallback({
            let calls = calls.clone();
            move |uri: Uri, headers: HeaderMap, body: Bytes| {
                let calls = calls.clone();
                let respond = respond.clone();
                async move {
                    let call = RecordedCall {
                        path: uri.path().to_string(),
                        headers,
                        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                    };
                    let (status, reply) = respond(&call);
                    calls.lock().unwrap().push(call);
                    (status, Json(reply))
                }
            }
        });

        let server = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                eprintln!("mock upstream error: {err}");
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            calls,
            server,
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}
