//! Gemini Gateway — generates text and images via the Gemini REST API.
//!
//! POST {base_url}/v1beta/models/{model}:generateContent
//! Headers:
//!   x-goog-api-key: {api_key}
//!   content-type: application/json

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{prompts, GatewayError, GenerationGateway, Operation, ResearchResult};
use crate::config::GeminiConfig;
use crate::models::{ReferenceImage, SourceCitation};

/// Safety categories relaxed for image generation.
const IMAGE_SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Low-level failure talking to Gemini. Never shown to the user directly.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not set. Configure it in the environment or the config file.")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response JSON: {0}")]
    InvalidJson(String),

    #[error("Response contained no text")]
    EmptyText,

    #[error("No content parts found in {0} response")]
    NoContentParts(&'static str),

    #[error("No image data found in {0} response")]
    NoImageData(&'static str),
}

pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }

    async fn generate_content(&self, model: &str, body: &Value) -> Result<Value, GeminiError> {
        if self.config.api_key.is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );

        tracing::info!("[Gateway] Calling Gemini API: {} (model: {})", url, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GeminiError::Http(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| GeminiError::InvalidJson(e.to_string()))
    }

    async fn generate_text(&self, prompt: &str, with_search: bool) -> Result<Value, GeminiError> {
        let mut body = json!({
            "contents": [
                { "role": "user", "parts": [{ "text": prompt }] }
            ]
        });
        if with_search {
            body["tools"] = json!([{ "google_search": {} }]);
        }
        self.generate_content(&self.config.text_model, &body).await
    }

    async fn text_operation(&self, operation: Operation, prompt: &str) -> Result<String, GatewayError> {
        self.generate_text(prompt, false)
            .await
            .and_then(|json| extract_text(&json))
            .map_err(|e| GatewayError::from_cause(operation, &e))
    }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    async fn research(&self, topic: &str) -> Result<ResearchResult, GatewayError> {
        let json = self
            .generate_text(&prompts::research(topic), true)
            .await
            .map_err(|e| GatewayError::from_cause(Operation::Research, &e))?;
        let text = extract_text(&json).map_err(|e| GatewayError::from_cause(Operation::Research, &e))?;
        Ok(ResearchResult {
            text,
            citations: extract_citations(&json),
        })
    }

    async fn outline(
        &self,
        topic: &str,
        research: &str,
        citations: &[SourceCitation],
        internal_links: &[String],
    ) -> Result<String, GatewayError> {
        let prompt = prompts::outline(topic, research, citations, internal_links);
        self.text_operation(Operation::Outline, &prompt).await
    }

    async fn content_part(
        &self,
        topic: &str,
        outline: &str,
        previous_content: &str,
        part: u8,
    ) -> Result<String, GatewayError> {
        let prompt = prompts::content_part(topic, outline, previous_content, part);
        self.text_operation(Operation::ContentPart, &prompt).await
    }

    async fn revise(&self, content: &str, feedback: &str) -> Result<String, GatewayError> {
        self.text_operation(Operation::Revise, &prompts::revise(content, feedback))
            .await
    }

    async fn production_package(&self, content: &str) -> Result<String, GatewayError> {
        self.text_operation(Operation::ProductionPackage, &prompts::production_package(content))
            .await
    }

    async fn generate_image(
        &self,
        prompt: &str,
        reference: Option<&ReferenceImage>,
    ) -> Result<String, GatewayError> {
        let body = image_request_body(prompt, reference);
        let kind = if reference.is_some() { "reference" } else { "prompt" };

        self.generate_content(&self.config.image_model, &body)
            .await
            .and_then(|json| extract_inline_image(&json, kind))
            .map_err(|e| GatewayError::from_cause(Operation::GenerateImage, &e))
    }
}

fn image_request_body(prompt: &str, reference: Option<&ReferenceImage>) -> Value {
    let mut parts = vec![json!({ "text": prompts::image(prompt, reference.is_some()) })];
    if let Some(image) = reference {
        parts.push(json!({
            "inlineData": { "mimeType": image.mime_type, "data": image.data }
        }));
    }

    let safety_settings: Vec<Value> = IMAGE_SAFETY_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": "BLOCK_NONE" }))
        .collect();

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": { "responseModalities": ["IMAGE"] },
        "safetySettings": safety_settings,
    })
}

fn first_candidate_parts(json: &Value) -> Option<&Vec<Value>> {
    json.get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
}

/// Concatenate the text parts of the first candidate.
pub fn extract_text(json: &Value) -> Result<String, GeminiError> {
    let text: String = first_candidate_parts(json)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GeminiError::EmptyText);
    }
    Ok(text)
}

/// Web grounding chunks of the first candidate. Chunks without a `web`
/// entry are skipped.
pub fn extract_citations(json: &Value) -> Vec<SourceCitation> {
    json.get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|candidate| candidate.get("groundingMetadata"))
        .and_then(|meta| meta.get("groundingChunks"))
        .and_then(|chunks| chunks.as_array())
        .map(|chunks| {
            chunks
                .iter()
                .filter_map(|chunk| {
                    let web = chunk.get("web")?;
                    Some(SourceCitation {
                        uri: web.get("uri")?.as_str()?.to_string(),
                        title: web
                            .get("title")
                            .and_then(|t| t.as_str())
                            .unwrap_or_default()
                            .to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Base64 data of the first inline-data part of the first candidate.
pub fn extract_inline_image(json: &Value, kind: &'static str) -> Result<String, GeminiError> {
    let parts = first_candidate_parts(json).ok_or(GeminiError::NoContentParts(kind))?;
    parts
        .iter()
        .find_map(|part| {
            part.get("inlineData")
                .or_else(|| part.get("inline_data"))
                .and_then(|data| data.get("data"))
                .and_then(|d| d.as_str())
        })
        .filter(|data| !data.is_empty())
        .map(str::to_string)
        .ok_or(GeminiError::NoImageData(kind))
}
