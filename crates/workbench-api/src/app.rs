//! Application builder: wires router, middleware and state into an Axum app.

use std::sync::Arc;

use workbench_core::config::AppConfig;
use workbench_core::error::AppError;
use workbench_realtime::AssetWatcher;
use workbench_worker::ResultsTaskGateway;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> axum::Router {
    build_router(state)
}

/// Runs the Workbench server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Workbench server...");

    // ── Step 1: Task gateway ─────────────────────────────────────
    let tasks = Arc::new(ResultsTaskGateway::from_config(&config.tasks));
    tracing::info!(
        results_dir = %config.tasks.results_dir,
        runner = %config.tasks.runner_program,
        "Task gateway ready"
    );

    // ── Step 2: Application state ────────────────────────────────
    let state = AppState::new(config.clone(), tasks)?;

    // ── Step 3: Static asset watcher ─────────────────────────────
    let _watcher = start_asset_watcher(&config, &state);

    // ── Step 4: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Workbench server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Workbench server stopped");
    Ok(())
}

fn start_asset_watcher(config: &AppConfig, state: &AppState) -> Option<AssetWatcher> {
    if !config.reload.enabled {
        return None;
    }

    match AssetWatcher::start(
        &config.reload.public_dir,
        config.reload.extensions.clone(),
        state.reload.clone(),
    ) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!(
                dir = %config.reload.public_dir,
                error = %e,
                "Static asset watcher disabled"
            );
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
