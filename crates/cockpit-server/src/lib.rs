//! Cockpit Server - HTTP backend for the Content Cockpit
//!
//! A thin axum adapter over `cockpit-core`, providing:
//! - the raw generation endpoints (`/api/research`, `/api/outline`, ...)
//! - wizard sessions driving the article workflow and image studio
//!
//! State lives in memory only; restarting the server drops all sessions.

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use cockpit_core::config::CockpitConfig;
use cockpit_core::state::{AppState, AppStateInner};

/// Configuration for the Cockpit backend server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3210,
        }
    }
}

impl ServerConfig {
    pub fn from_cockpit_config(config: &CockpitConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
        }
    }
}

/// Create a shared `AppState` backed by the Gemini gateway.
pub fn create_app_state(config: CockpitConfig) -> AppState {
    if config.gemini.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }
    Arc::new(AppStateInner::new(config))
}

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cockpit_core=warn,cockpit_server=info,tower_http=info".into()),
        )
        .try_init();
}

/// Start the backend server.
///
/// Returns the actual address the server is listening on.
pub async fn start_server(
    config: ServerConfig,
    cockpit: CockpitConfig,
) -> Result<SocketAddr, String> {
    init_tracing();

    tracing::info!(
        "Starting Cockpit backend server on {}:{}",
        config.host,
        config.port
    );

    let state = create_app_state(cockpit);

    start_server_with_state(config, state).await
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::api_router())
        .route("/api/health", axum::routing::get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server with a pre-built `AppState`.
///
/// Tests use this with a scripted gateway and port 0.
pub async fn start_server_with_state(
    config: ServerConfig,
    state: AppState,
) -> Result<SocketAddr, String> {
    let app = app(state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local address: {}", e))?;

    tracing::info!("Cockpit backend server listening on {}", local_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "server": "cockpit-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
