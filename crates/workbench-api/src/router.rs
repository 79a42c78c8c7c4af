//! Route definitions for the Workbench HTTP API.
//!
//! All routes are mounted under `/api`; everything else falls through to
//! the static asset directory.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let public_dir = state.config.reload.public_dir.clone();

    let api_routes = Router::new()
        .merge(workspace_routes())
        .merge(task_routes())
        .merge(system_routes());

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(public_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Tree, file and root-selection endpoints
fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route("/tree", get(handlers::fs::get_tree))
        .route(
            "/file",
            get(handlers::fs::read_file)
                .post(handlers::fs::save_file)
                .delete(handlers::fs::delete_file),
        )
        .route("/mkdir", post(handlers::fs::make_dir))
        .route("/browse", get(handlers::fs::browse))
        .route(
            "/root",
            get(handlers::fs::get_root).post(handlers::fs::set_root),
        )
}

/// Task list, artifacts and runs
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(handlers::tasks::list_tasks))
        .route("/task/{id}", get(handlers::tasks::get_task))
        .route("/run", post(handlers::tasks::run_task))
}

/// Health, status and reload stream
fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/status", get(handlers::health::status))
        .route("/reload", get(handlers::reload::reload_stream))
}
