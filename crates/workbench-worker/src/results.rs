//! Task gateway backed by a results directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::fs;

use workbench_core::config::TasksConfig;
use workbench_core::error::AppError;
use workbench_core::result::AppResult;
use workbench_core::types::{RunAck, TaskArtifacts, TaskList, TaskSummary};
use workbench_storage::PathGuard;

use crate::gateway::TaskGateway;
use crate::runner::ProcessRunner;

/// Prefix of task directory names.
const TASK_PREFIX: &str = "task_";
/// Characters of `output.txt` shown in a summary.
const PREVIEW_CHARS: usize = 200;
/// Artifact files returned for a single task, in display order.
pub const TASK_ARTIFACTS: [&str; 6] = [
    "result.json",
    "output.txt",
    "report.txt",
    "detailed_report.json",
    "hierarchy.json",
    "stats.json",
];

/// Reads task results from disk and starts new runs through a [`ProcessRunner`].
#[derive(Debug, Clone)]
pub struct ResultsTaskGateway {
    /// Directory holding one `task_*` directory per task.
    results_dir: PathBuf,
    /// Spawner for new runs.
    runner: ProcessRunner,
    /// Description used for empty run requests.
    default_description: String,
}

impl ResultsTaskGateway {
    /// Create a gateway over `results_dir`.
    pub fn new(
        results_dir: impl Into<PathBuf>,
        runner: ProcessRunner,
        default_description: impl Into<String>,
    ) -> Self {
        Self {
            results_dir: results_dir.into(),
            runner,
            default_description: default_description.into(),
        }
    }

    /// Create a gateway from the tasks configuration section.
    pub fn from_config(config: &TasksConfig) -> Self {
        Self::new(
            &config.results_dir,
            ProcessRunner::from_config(config),
            &config.default_description,
        )
    }

    /// Directory scanned for tasks.
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    async fn summarize(&self, id: String, dir: &Path) -> AppResult<TaskSummary> {
        let result = match read_optional(&dir.join("result.json")).await? {
            Some(text) => serde_json::from_str::<Value>(&text).unwrap_or_else(|e| {
                tracing::warn!(task = %id, error = %e, "Ignoring malformed result.json");
                Value::Null
            }),
            None => Value::Null,
        };
        let preview = read_optional(&dir.join("output.txt"))
            .await?
            .map(|text| text.chars().take(PREVIEW_CHARS).collect())
            .unwrap_or_else(|| "(no output)".to_string());

        let meta = fs::metadata(dir).await?;
        let timestamp = meta
            .created()
            .or_else(|_| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        let verification = &result["verification"];
        Ok(TaskSummary {
            description: result["description"].as_str().unwrap_or("(none)").to_string(),
            status: result["status"].as_str().unwrap_or("unknown").to_string(),
            verified: verification["passed"].as_bool().unwrap_or(false),
            score: verification["score"].as_f64().unwrap_or(0.0),
            preview,
            timestamp,
            id,
        })
    }
}

#[async_trait]
impl TaskGateway for ResultsTaskGateway {
    async fn list(&self) -> AppResult<TaskList> {
        if !fs::try_exists(&self.results_dir).await.unwrap_or(false) {
            return Ok(TaskList::default());
        }

        let mut reader = fs::read_dir(&self.results_dir).await?;
        let mut dirs = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            if is_dir && name.starts_with(TASK_PREFIX) {
                dirs.push((name, entry.path()));
            }
        }
        dirs.sort_by(|a, b| b.0.cmp(&a.0));

        let mut tasks = Vec::with_capacity(dirs.len());
        for (name, path) in dirs {
            tasks.push(self.summarize(name, &path).await?);
        }

        Ok(TaskList {
            total: tasks.len(),
            tasks,
        })
    }

    async fn get(&self, id: &str) -> AppResult<TaskArtifacts> {
        if id.trim().is_empty() {
            return Err(AppError::validation("Task id is required"));
        }
        let guard = PathGuard::new(&self.results_dir)
            .map_err(|_| AppError::not_found(format!("Task not found: {id}")))?;
        let dir = guard.resolve(id)?;

        // Only direct `task_*` children of the results directory are tasks.
        let is_task = dir.parent() == Some(guard.root())
            && dir
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with(TASK_PREFIX));
        if !is_task || !fs::metadata(&dir).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(AppError::not_found(format!("Task not found: {id}")));
        }

        let mut artifacts = TaskArtifacts::new();
        for name in TASK_ARTIFACTS {
            let Some(text) = read_optional(&dir.join(name)).await? else {
                continue;
            };
            let value = if name.ends_with(".json") {
                serde_json::from_str(&text)?
            } else {
                Value::String(text)
            };
            artifacts.insert(name.to_string(), value);
        }
        Ok(artifacts)
    }

    async fn run(&self, description: &str) -> AppResult<RunAck> {
        let description = match description.trim() {
            "" => self.default_description.clone(),
            trimmed => trimmed.to_string(),
        };

        self.runner.spawn(&description)?;

        Ok(RunAck {
            status: "running".to_string(),
            message: "Task started in background".to_string(),
            description,
        })
    }
}

async fn read_optional(path: &Path) -> AppResult<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
