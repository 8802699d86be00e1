mod config;
mod dispatcher;
mod error;
mod handlers;
mod phone;
mod providers;
mod response;
mod types;

#[cfg(test)]
mod testutil;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tower_http::cors::CorsLayer;

use config::Config;
use dispatcher::Dispatcher;
use handlers::AppState;

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/send",
            post(handlers::send_message)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route("/api/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let config = Config::from_env();
    info!("Outbound provider: {}", config.provider.name());
    if let Some(timeout) = config.http_timeout {
        info!("Outbound timeout: {}ms", timeout.as_millis());
    }

    let state = Arc::new(AppState {
        dispatcher: Dispatcher::from_config(&config)?,
    });

    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
