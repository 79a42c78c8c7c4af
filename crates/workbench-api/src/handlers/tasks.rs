//! Task gateway handlers.

use axum::Json;
use axum::extract::{Path, State};

use workbench_core::types::{RunAck, TaskArtifacts, TaskList};

use crate::dto::request::RunRequest;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/tasks
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<TaskList>> {
    Ok(Json(state.tasks.list().await?))
}

/// GET /api/task/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskArtifacts>> {
    Ok(Json(state.tasks.get(&id).await?))
}

/// POST /api/run
pub async fn run_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RunRequest>,
) -> ApiResult<Json<RunAck>> {
    let ack = state.tasks.run(&req.description).await?;
    tracing::info!(description = %ack.description, "Task run requested");
    Ok(Json(ack))
}
