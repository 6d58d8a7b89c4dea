//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command and reuses
//! the cockpit-core domain logic.

pub mod config;
pub mod image;
pub mod server;
pub mod wizard;

use std::sync::Arc;

use cockpit_core::config::CockpitConfig;
use cockpit_core::gateway::{GeminiGateway, GenerationGateway, HttpGateway};

/// Pick the gateway: a remote cockpit server if given, Gemini otherwise.
pub fn gateway(config: &CockpitConfig, remote: Option<&str>) -> Arc<dyn GenerationGateway> {
    match remote {
        Some(url) => {
            tracing::info!("[CLI] Using remote gateway at {}", url);
            Arc::new(HttpGateway::new(url, config.gemini.timeout_secs))
        }
        None => Arc::new(GeminiGateway::new(config.gemini.clone())),
    }
}
