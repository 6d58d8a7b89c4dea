//! HTTP Gateway — calls a remote cockpit server's generation endpoints.
//!
//! Wire format (JSON, camelCase), relative to the configured base URL:
//!
//! ```text
//! POST /research         {topic}                                    -> {text, sources}
//! POST /outline          {topic, research, sourceList, internalLinks} -> {text}
//! POST /content          {topic, outline, previousContent, part}    -> {text}
//! POST /revise           {content, feedback}                        -> {text}
//! POST /production-html  {content}                                  -> {html}
//! POST /image            {prompt, referenceImage}                   -> {image}
//! ```
//!
//! Error responses carry `{ "error": message }`; that message is passed
//! through to the caller as-is.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{GatewayError, GenerationGateway, Operation, ResearchResult};
use crate::models::{ReferenceImage, SourceCitation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResponse {
    pub text: String,
    #[serde(default)]
    pub sources: Vec<SourceCitation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineRequest {
    pub topic: String,
    pub research: String,
    #[serde(default)]
    pub source_list: Vec<SourceCitation>,
    #[serde(default)]
    pub internal_links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub topic: String,
    pub outline: String,
    #[serde(default)]
    pub previous_content: String,
    pub part: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviseRequest {
    pub content: String,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub prompt: String,
    /// Data URL or bare base64.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlResponse {
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub image: String,
}

pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B, R>(&self, operation: Operation, path: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::info!("[Gateway] POST {} ({})", url, operation);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::from_cause(operation, &e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GatewayError::from_cause(operation, &e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&response_text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
            return Err(match message {
                Some(message) => GatewayError::new(operation, message),
                None => GatewayError::from_cause(
                    operation,
                    &format!("server returned {}: {}", status, response_text),
                ),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| GatewayError::from_cause(operation, &e))
    }
}

#[async_trait]
impl GenerationGateway for HttpGateway {
    async fn research(&self, topic: &str) -> Result<ResearchResult, GatewayError> {
        let response: ResearchResponse = self
            .post(
                Operation::Research,
                "/research",
                &ResearchRequest {
                    topic: topic.to_string(),
                },
            )
            .await?;
        Ok(ResearchResult {
            text: response.text,
            citations: response.sources,
        })
    }

    async fn outline(
        &self,
        topic: &str,
        research: &str,
        citations: &[SourceCitation],
        internal_links: &[String],
    ) -> Result<String, GatewayError> {
        let request = OutlineRequest {
            topic: topic.to_string(),
            research: research.to_string(),
            source_list: citations.to_vec(),
            internal_links: internal_links.to_vec(),
        };
        let response: TextResponse = self.post(Operation::Outline, "/outline", &request).await?;
        Ok(response.text)
    }

    async fn content_part(
        &self,
        topic: &str,
        outline: &str,
        previous_content: &str,
        part: u8,
    ) -> Result<String, GatewayError> {
        let request = ContentRequest {
            topic: topic.to_string(),
            outline: outline.to_string(),
            previous_content: previous_content.to_string(),
            part,
        };
        let response: TextResponse = self.post(Operation::ContentPart, "/content", &request).await?;
        Ok(response.text)
    }

    async fn revise(&self, content: &str, feedback: &str) -> Result<String, GatewayError> {
        let request = ReviseRequest {
            content: content.to_string(),
            feedback: feedback.to_string(),
        };
        let response: TextResponse = self.post(Operation::Revise, "/revise", &request).await?;
        Ok(response.text)
    }

    async fn production_package(&self, content: &str) -> Result<String, GatewayError> {
        let request = ProductionRequest {
            content: content.to_string(),
        };
        let response: HtmlResponse = self
            .post(Operation::ProductionPackage, "/production-html", &request)
            .await?;
        Ok(response.html)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        reference: Option<&ReferenceImage>,
    ) -> Result<String, GatewayError> {
        let request = ImageRequest {
            prompt: prompt.to_string(),
            reference_image: reference.map(ReferenceImage::to_data_url),
        };
        let response: ImageResponse = self.post(Operation::GenerateImage, "/image", &request).await?;
        Ok(response.image)
    }
}
