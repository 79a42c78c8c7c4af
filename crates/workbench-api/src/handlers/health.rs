//! Health and status handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{HealthResponse, StatusResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let results_dir = state.config.tasks.results_dir.clone();
    let results_exist = tokio::fs::try_exists(&results_dir).await.unwrap_or(false);

    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        root: state.store().await.root().display().to_string(),
        results_dir,
        results_exist,
        reload_clients: state.reload.client_count(),
    })
}
