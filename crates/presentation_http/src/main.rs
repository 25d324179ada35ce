//! MindSpace HTTP Server
//!
//! Main entry point for the chat service.

use std::{sync::Arc, time::Duration};

use axum::http::{HeaderValue, Method};
use infrastructure::{AppConfig, Clients, LoggingConfig, init_logging};
use presentation_http::{
    AppState, create_router, drain_within, set_expose_internal_errors, wait_for_signal,
};
use tokio::{net::TcpListener, sync::Notify};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the format is known
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::fallback(), Some(e)),
    };

    init_logging(&LoggingConfig::with_format(config.server.log_format))?;

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    info!(
        "MindSpace v{} starting ({} environment)",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );
    info!(
        host = %config.server.host,
        port = %config.server.port,
        model = %config.inference.model,
        audio_dir = %config.storage.audio_dir,
        "Configuration loaded"
    );

    set_expose_internal_errors(config.is_development());

    // Initialize provider clients; missing credentials disable a gateway
    let clients = Clients::init(&config);
    let state = AppState::from_clients(&clients, &config);

    let services = state.health.services();
    if !services.all_available() {
        warn!(?services, "Some gateways are unavailable, matching requests will fail");
    }

    let cors_layer = if config.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };

    let app = create_router(state, &config.server.static_dir).layer(cors_layer);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    let shutdown = Arc::new(Notify::new());
    let trigger = Arc::clone(&shutdown);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        wait_for_signal().await;
        trigger.notify_one();
    });

    match drain_within(server, shutdown, shutdown_timeout).await {
        Some(result) => {
            result?;
            info!("Server shutdown complete");
        },
        None => warn!("Server shutdown forced after {:?}", shutdown_timeout),
    }

    Ok(())
}
