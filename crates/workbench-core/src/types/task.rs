//! Task listing and run payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a finished (or running) task found in the results directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Directory name, e.g. `task_20240101_120000`.
    pub id: String,
    /// Description recorded in `result.json`.
    pub description: String,
    /// Status recorded in `result.json`.
    pub status: String,
    /// Whether verification passed.
    pub verified: bool,
    /// Verification score.
    pub score: f64,
    /// First characters of `output.txt`.
    pub preview: String,
    /// Creation time of the task directory.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Task list response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskList {
    /// Tasks, newest first.
    pub tasks: Vec<TaskSummary>,
    /// Number of tasks.
    pub total: usize,
}

/// Named artifacts of one task; JSON artifacts are parsed, text kept verbatim.
pub type TaskArtifacts = BTreeMap<String, serde_json::Value>;

/// Immediate acknowledgement of a fire-and-forget run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAck {
    /// Always `"running"`.
    pub status: String,
    /// Human-readable note.
    pub message: String,
    /// Description the runner was started with.
    pub description: String,
}
