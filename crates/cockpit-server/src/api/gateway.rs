//! Raw generation endpoints. Each request maps onto one gateway call;
//! gateway failures surface as 502 with `{ "error": message }`.

use axum::{extract::State, routing::post, Json, Router};

use cockpit_core::error::ServerError;
use cockpit_core::gateway::http::{
    ContentRequest, HtmlResponse, ImageRequest, ImageResponse, OutlineRequest, ProductionRequest,
    ResearchRequest, ResearchResponse, ReviseRequest, TextResponse,
};
use cockpit_core::models::ReferenceImage;
use cockpit_core::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/research", post(research))
        .route("/outline", post(outline))
        .route("/content", post(content))
        .route("/revise", post(revise))
        .route("/production-html", post(production_html))
        .route("/image", post(image))
}

fn require(value: &str, field: &str) -> Result<(), ServerError> {
    if value.trim().is_empty() {
        return Err(ServerError::BadRequest(format!("Missing required field: {}", field)));
    }
    Ok(())
}

/// POST /api/research
async fn research(
    State(state): State<AppState>,
    Json(body): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, ServerError> {
    require(&body.topic, "topic")?;
    let result = state.gateway.research(body.topic.trim()).await?;
    Ok(Json(ResearchResponse {
        text: result.text,
        sources: result.citations,
    }))
}

/// POST /api/outline
async fn outline(
    State(state): State<AppState>,
    Json(body): Json<OutlineRequest>,
) -> Result<Json<TextResponse>, ServerError> {
    require(&body.topic, "topic")?;
    require(&body.research, "research")?;
    let text = state
        .gateway
        .outline(&body.topic, &body.research, &body.source_list, &body.internal_links)
        .await?;
    Ok(Json(TextResponse { text }))
}

/// POST /api/content
async fn content(
    State(state): State<AppState>,
    Json(body): Json<ContentRequest>,
) -> Result<Json<TextResponse>, ServerError> {
    require(&body.topic, "topic")?;
    require(&body.outline, "outline")?;
    if !(1..=3).contains(&body.part) {
        return Err(ServerError::BadRequest(format!(
            "part must be 1, 2 or 3 (got {})",
            body.part
        )));
    }
    let text = state
        .gateway
        .content_part(&body.topic, &body.outline, &body.previous_content, body.part)
        .await?;
    Ok(Json(TextResponse { text }))
}

/// POST /api/revise
async fn revise(
    State(state): State<AppState>,
    Json(body): Json<ReviseRequest>,
) -> Result<Json<TextResponse>, ServerError> {
    require(&body.content, "content")?;
    require(&body.feedback, "feedback")?;
    let text = state.gateway.revise(&body.content, &body.feedback).await?;
    Ok(Json(TextResponse { text }))
}

/// POST /api/production-html
async fn production_html(
    State(state): State<AppState>,
    Json(body): Json<ProductionRequest>,
) -> Result<Json<HtmlResponse>, ServerError> {
    require(&body.content, "content")?;
    let html = state.gateway.production_package(&body.content).await?;
    Ok(Json(HtmlResponse { html }))
}

/// POST /api/image
async fn image(
    State(state): State<AppState>,
    Json(body): Json<ImageRequest>,
) -> Result<Json<ImageResponse>, ServerError> {
    require(&body.prompt, "prompt")?;
    let reference = body
        .reference_image
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .map(|r| ReferenceImage::parse(r, None))
        .transpose()
        .map_err(ServerError::BadRequest)?;
    let image = state
        .gateway
        .generate_image(body.prompt.trim(), reference.as_ref())
        .await?;
    Ok(Json(ImageResponse { image }))
}
