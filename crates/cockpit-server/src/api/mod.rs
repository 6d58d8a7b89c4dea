pub mod gateway;
pub mod images;
pub mod sessions;

use axum::Router;

use cockpit_core::state::AppState;

/// Build the complete API router with all sub-routes.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/api", gateway::router())
        .nest("/api/sessions", sessions::router().merge(images::session_router()))
        .nest("/api/image-filters", images::filters_router())
}
