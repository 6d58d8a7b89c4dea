//! Cockpit Core — Transport-agnostic domain logic for the Content Cockpit.
//!
//! This crate contains the article wizard state machine, the revision loop,
//! the image studio, and the generation gateways that talk to the model
//! backend. It has **no HTTP framework dependency** by default, making it
//! suitable for use in:
//!
//! - HTTP servers (via `cockpit-server`)
//! - CLI tools (via `cockpit-cli`)
//!
//! # Feature Flags
//!
//! - `axum` — Enables `IntoResponse` impl on `ServerError` for use in axum handlers.

pub mod config;
pub mod error;
pub mod gateway;
pub mod image;
pub mod models;
pub mod session;
pub mod state;
pub mod store;
pub mod workflow;

// Convenience re-exports
pub use config::CockpitConfig;
pub use error::ServerError;
pub use gateway::{GatewayError, GenerationGateway};
pub use session::WizardSession;
pub use state::{AppState, AppStateInner};
pub use workflow::{ArticleWizard, WizardError, WizardSnapshot};
