//! Core error type for the Content Cockpit.
//!
//! `ServerError` is what adapters surface to callers. Domain errors
//! (`WizardError`, `ImageError`, `GatewayError`) convert into it.
//! When the `axum` feature is enabled, it also implements `IntoResponse`
//! so it can be used directly as an axum handler error type.

use crate::gateway::GatewayError;
use crate::image::ImageError;
use crate::workflow::WizardError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Generation failed: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<WizardError> for ServerError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::InputValidation(_) | WizardError::InvalidTransition(_) => {
                ServerError::BadRequest(err.to_string())
            }
            WizardError::Busy => ServerError::Conflict(err.to_string()),
        }
    }
}

impl From<ImageError> for ServerError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InputValidation(_) => ServerError::BadRequest(err.to_string()),
            ImageError::Busy => ServerError::Conflict(err.to_string()),
        }
    }
}

impl From<GatewayError> for ServerError {
    fn from(err: GatewayError) -> Self {
        ServerError::BadGateway(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// axum integration (opt-in via feature flag)
// ---------------------------------------------------------------------------

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match &self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ServerError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ServerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
