//! Shared application state for the axum server.

use std::sync::Arc;

use crate::config::CockpitConfig;
use crate::gateway::gemini::GeminiGateway;
use crate::gateway::GenerationGateway;
use crate::store::SessionStore;

/// Shared state accessible by all API handlers.
pub struct AppStateInner {
    pub config: CockpitConfig,
    pub gateway: Arc<dyn GenerationGateway>,
    pub session_store: SessionStore,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    /// State backed by the Gemini API.
    pub fn new(config: CockpitConfig) -> Self {
        let gateway = Arc::new(GeminiGateway::new(config.gemini.clone()));
        Self::with_gateway(config, gateway)
    }

    pub fn with_gateway(config: CockpitConfig, gateway: Arc<dyn GenerationGateway>) -> Self {
        Self {
            session_store: SessionStore::new(config.internal_links.clone()),
            gateway,
            config,
        }
    }
}
