//! Wizard sessions. Intents that need the model run the gateway call before
//! responding; the returned snapshot already carries the result or the
//! recorded error.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use cockpit_core::error::ServerError;
use cockpit_core::session::WizardSession;
use cockpit_core::state::AppState;
use cockpit_core::workflow::WizardSnapshot;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/{session_id}", get(get_session).delete(delete_session))
        .route("/{session_id}/start", post(start))
        .route("/{session_id}/accept", post(accept))
        .route("/{session_id}/retry", post(retry))
        .route("/{session_id}/reset", post(reset))
        .route("/{session_id}/editing", post(toggle_editing))
        .route("/{session_id}/feedback", post(submit_feedback).put(set_feedback))
}

pub(crate) async fn find_session(
    state: &AppState,
    session_id: &str,
) -> Result<Arc<WizardSession>, ServerError> {
    state
        .session_store
        .get(session_id)
        .await
        .ok_or_else(|| ServerError::NotFound(format!("Session {} not found", session_id)))
}

/// GET /api/sessions — List wizard sessions.
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.session_store.list().await;
    Json(serde_json::json!({ "sessions": sessions }))
}

/// POST /api/sessions — Create a wizard session at topic input.
async fn create_session(State(state): State<AppState>) -> Json<serde_json::Value> {
    let session = state.session_store.create().await;
    Json(serde_json::json!({
        "session": session.info().await,
        "wizard": session.snapshot().await,
    }))
}

/// GET /api/sessions/{session_id} — Wizard and image studio state.
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    Ok(Json(serde_json::json!({
        "session": session.info().await,
        "wizard": session.snapshot().await,
        "image": session.image_snapshot().await,
    })))
}

/// DELETE /api/sessions/{session_id}
async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    if !state.session_store.delete(&session_id).await {
        return Err(ServerError::NotFound(format!("Session {} not found", session_id)));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
struct StartRequest {
    #[serde(default)]
    topic: String,
}

/// POST /api/sessions/{session_id}/start — Begin a run and fetch research.
async fn start(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<StartRequest>,
) -> Result<Json<WizardSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    let snapshot = session
        .drive(state.gateway.clone(), |w| w.start(&body.topic))
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/{session_id}/accept — Accept the draft and generate the next one.
async fn accept(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<WizardSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    let snapshot = session.drive(state.gateway.clone(), |w| w.accept()).await?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/{session_id}/retry — Re-issue the failed request.
async fn retry(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<WizardSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    let snapshot = session.drive(state.gateway.clone(), |w| w.retry()).await?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/{session_id}/reset
async fn reset(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<WizardSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    let snapshot = session
        .update(|w| {
            w.reset();
            Ok(())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/{session_id}/editing — Toggle between viewing and editing.
async fn toggle_editing(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<WizardSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    let snapshot = session.update(|w| w.toggle_editing()).await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    #[serde(default)]
    feedback: String,
}

/// PUT /api/sessions/{session_id}/feedback — Store typed feedback.
async fn set_feedback(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<WizardSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    let snapshot = session.update(|w| w.set_feedback(&body.feedback)).await?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/{session_id}/feedback — Submit feedback for a revision.
async fn submit_feedback(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<WizardSnapshot>, ServerError> {
    let session = find_session(&state, &session_id).await?;
    let snapshot = session
        .drive(state.gateway.clone(), |w| w.submit_feedback(&body.feedback))
        .await?;
    Ok(Json(snapshot))
}
