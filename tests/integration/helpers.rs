//! Shared test helpers for integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use workbench_api::{AppState, build_app};
use workbench_core::config::AppConfig;
use workbench_worker::ResultsTaskGateway;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Shared state, for tests that serve the app over TCP
    pub state: AppState,
    /// Holds every directory the app touches
    dir: TempDir,
}

impl TestApp {
    /// Create a new test application.
    ///
    /// Layout: `base/project` is the root, `base` bounds root switching,
    /// `results` holds tasks and `public` holds static assets.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test application after adjusting the configuration.
    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let base = dir.path().join("base");
        std::fs::create_dir_all(base.join("project")).expect("Failed to create root");
        std::fs::create_dir_all(dir.path().join("results")).expect("Failed to create results");
        std::fs::create_dir_all(dir.path().join("public")).expect("Failed to create public");

        let mut config = AppConfig::default();
        config.workspace.root = base.join("project").display().to_string();
        config.workspace.base_root = base.display().to_string();
        config.tasks.results_dir = dir.path().join("results").display().to_string();
        config.tasks.runner_program = "true".to_string();
        config.tasks.runner_args = Vec::new();
        config.reload.public_dir = dir.path().join("public").display().to_string();
        adjust(&mut config);

        let tasks = Arc::new(ResultsTaskGateway::from_config(&config.tasks));
        let state = AppState::new(config.clone(), tasks).expect("Failed to build state");
        let router = build_app(state.clone());

        Self {
            router,
            config,
            state,
            dir,
        }
    }

    /// Directory served as the workspace root.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("base").join("project")
    }

    /// Directory bounding root switching.
    pub fn base(&self) -> PathBuf {
        self.dir.path().join("base")
    }

    /// Directory holding task results.
    pub fn results(&self) -> PathBuf {
        self.dir.path().join("results")
    }

    /// Write a file below the workspace root, creating parents.
    pub fn write(&self, relative: &str, content: &str) {
        write_file(&self.root(), relative, content);
    }

    /// Write a task directory with the given artifacts.
    pub fn write_task(&self, id: &str, artifacts: &[(&str, &str)]) {
        for (name, content) in artifacts {
            write_file(&self.results(), &format!("{id}/{name}"), content);
        }
    }

    /// Make a JSON request to the app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Length", json.to_string().len());
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

fn write_file(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// Test response wrapper
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON
    pub body: Value,
}

impl TestResponse {
    /// Error code of an error body.
    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}
