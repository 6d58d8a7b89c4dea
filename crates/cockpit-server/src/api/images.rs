//! Image studio endpoints, scoped to a wizard session.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use cockpit_core::error::ServerError;
use cockpit_core::image::{ImageSnapshot, STYLE_FILTERS};
use cockpit_core::state::AppState;

use super::sessions::find_session;

/// Routes merged into `/api/sessions`.
pub fn session_router() -> Router<AppState> {
    Router::new()
        .route("/{session_id}/image", get(get_image).post(generate_image))
        .route("/{session_id}/image/filter", post(apply_filter))
}

/// Routes nested at `/api/image-filters`.
pub fn filters_router() -> Router<AppState> {
    Router::new().route("/", get(list_filters))
}

/// GET /api/image-filters
async fn list_filters() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "filters": STYLE_FILTERS }))
}

/// GET /api/sessions/{session_id}/image
async fn get_image(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ImageSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    Ok(Json(session.image_snapshot().await))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateImageRequest {
    #[serde(default)]
    prompt: String,
    /// Data URL or bare base64. Absent keeps the current reference; empty clears it.
    reference_image: Option<String>,
}

/// POST /api/sessions/{session_id}/image — Generate an image.
async fn generate_image(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<GenerateImageRequest>,
) -> Result<Json<ImageSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    let snapshot = session
        .drive_image(state.gateway.clone(), |studio| {
            studio.submit(&body.prompt, body.reference_image.as_deref())
        })
        .await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
struct FilterRequest {
    name: String,
}

/// POST /api/sessions/{session_id}/image/filter — Append a style filter to the prompt.
async fn apply_filter(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<FilterRequest>,
) -> Result<Json<ImageSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    let snapshot = session
        .update_image(|studio| studio.apply_filter(&body.name).map(|_| ()))
        .await?;
    Ok(Json(snapshot))
}
