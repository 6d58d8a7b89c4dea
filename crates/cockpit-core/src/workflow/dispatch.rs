use serde::Serialize;

use crate::gateway::{GatewayError, GenerationGateway, Operation, ResearchResult};
use crate::models::SourceCitation;

/// Identifies one emitted request. Completions carrying any other ticket
/// than the outstanding one are ignored.
pub type Ticket = u64;

/// A generation call the wizard wants made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GenerationRequest {
    Research {
        topic: String,
    },
    #[serde(rename_all = "camelCase")]
    Outline {
        topic: String,
        research: String,
        citations: Vec<SourceCitation>,
        internal_links: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    ContentPart {
        topic: String,
        outline: String,
        previous_content: String,
        part: u8,
    },
    Revise {
        content: String,
        feedback: String,
    },
    ProductionPackage {
        content: String,
    },
}

impl GenerationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Research { .. } => Operation::Research,
            Self::Outline { .. } => Operation::Outline,
            Self::ContentPart { .. } => Operation::ContentPart,
            Self::Revise { .. } => Operation::Revise,
            Self::ProductionPackage { .. } => Operation::ProductionPackage,
        }
    }
}

/// What a successful call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutput {
    Research(ResearchResult),
    Text(String),
}

impl GenerationOutput {
    /// Split into text and citations. Only research carries citations.
    pub fn into_parts(self) -> (String, Vec<SourceCitation>) {
        match self {
            Self::Research(result) => (result.text, result.citations),
            Self::Text(text) => (text, Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub request: GenerationRequest,
}

/// Run a dispatch against a gateway. Exactly one gateway call is made.
pub async fn execute(
    gateway: &dyn GenerationGateway,
    dispatch: Dispatch,
) -> (Ticket, Result<GenerationOutput, GatewayError>) {
    let Dispatch { ticket, request } = dispatch;
    tracing::info!("[Wizard] Executing {} (ticket {})", request.operation(), ticket);

    let outcome = match request {
        GenerationRequest::Research { topic } => {
            gateway.research(&topic).await.map(GenerationOutput::Research)
        }
        GenerationRequest::Outline {
            topic,
            research,
            citations,
            internal_links,
        } => gateway
            .outline(&topic, &research, &citations, &internal_links)
            .await
            .map(GenerationOutput::Text),
        GenerationRequest::ContentPart {
            topic,
            outline,
            previous_content,
            part,
        } => gateway
            .content_part(&topic, &outline, &previous_content, part)
            .await
            .map(GenerationOutput::Text),
        GenerationRequest::Revise { content, feedback } => gateway
            .revise(&content, &feedback)
            .await
            .map(GenerationOutput::Text),
        GenerationRequest::ProductionPackage { content } => gateway
            .production_package(&content)
            .await
            .map(GenerationOutput::Text),
    };

    (ticket, outcome)
}
