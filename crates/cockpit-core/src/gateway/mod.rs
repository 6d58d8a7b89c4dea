//! Generation gateway: the remote model capability the wizard drives.
//!
//! # Architecture
//!
//! ```text
//! ArticleWizard ──► Dispatch ──► GenerationGateway
//!                                    │
//!                 ┌──────────────────┴──────────────────┐
//!           GeminiGateway                          HttpGateway
//!      (generateContent REST API)          (cockpit-server /api endpoints)
//! ```
//!
//! Every operation is a single attempt: the result or the failure is handed
//! back to the caller unchanged, with no retry or caching.

pub mod gemini;
pub mod http;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{ReferenceImage, SourceCitation};

pub use gemini::GeminiGateway;
pub use http::HttpGateway;

/// The logical operations a gateway offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Research,
    Outline,
    ContentPart,
    Revise,
    ProductionPackage,
    GenerateImage,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Outline => "outline",
            Self::ContentPart => "contentPart",
            Self::Revise => "revise",
            Self::ProductionPackage => "productionPackage",
            Self::GenerateImage => "generateImage",
        }
    }

    /// The message shown to the user when this operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Research => "Fehler bei der Webrecherche. Bitte versuchen Sie es später erneut.",
            Self::Outline => {
                "Fehler bei der Gliederungserstellung. Bitte versuchen Sie es später erneut."
            }
            Self::ContentPart => {
                "Fehler bei der Inhaltserstellung. Bitte versuchen Sie es später erneut."
            }
            Self::Revise => "Fehler bei der Überarbeitung. Bitte versuchen Sie es später erneut.",
            Self::ProductionPackage => {
                "Der finale Blogartikel konnte nicht generiert werden: Fehler bei der HTML-Generierung. Bitte versuchen Sie es später erneut."
            }
            Self::GenerateImage => {
                "Fehler bei der Bildgenerierung. Bitte versuchen Sie es später erneut."
            }
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed gateway call. `message` is meant for the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GatewayError {
    pub operation: Operation,
    pub message: String,
}

impl GatewayError {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }

    /// Replace a low-level cause with the operation's user-facing message.
    /// The cause is logged, not shown.
    pub fn from_cause(operation: Operation, cause: &dyn std::fmt::Display) -> Self {
        tracing::error!("[Gateway] {} failed: {}", operation, cause);
        Self::new(operation, operation.failure_message())
    }
}

/// Output of the research operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub text: String,
    #[serde(default)]
    pub citations: Vec<SourceCitation>,
}

#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn research(&self, topic: &str) -> Result<ResearchResult, GatewayError>;

    async fn outline(
        &self,
        topic: &str,
        research: &str,
        citations: &[SourceCitation],
        internal_links: &[String],
    ) -> Result<String, GatewayError>;

    async fn content_part(
        &self,
        topic: &str,
        outline: &str,
        previous_content: &str,
        part: u8,
    ) -> Result<String, GatewayError>;

    async fn revise(&self, content: &str, feedback: &str) -> Result<String, GatewayError>;

    async fn production_package(&self, content: &str) -> Result<String, GatewayError>;

    /// Returns the generated image as base64.
    async fn generate_image(
        &self,
        prompt: &str,
        reference: Option<&ReferenceImage>,
    ) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cause_hides_the_cause() {
        let err = GatewayError::from_cause(Operation::Research, &"HTTP 500: quota exceeded");
        assert_eq!(err.operation, Operation::Research);
        assert_eq!(err.message, Operation::Research.failure_message());
        assert!(!err.message.contains("quota"));
    }

    #[test]
    fn test_production_failure_names_html_generation() {
        let message = Operation::ProductionPackage.failure_message();
        assert!(message.starts_with("Der finale Blogartikel konnte nicht generiert werden: "));
        assert!(message.contains("Fehler bei der HTML-Generierung."));
    }
}
