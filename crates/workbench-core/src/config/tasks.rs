//! Background task runner configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the external task-execution collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Directory holding one `task_*` sub-directory per finished task.
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    /// Program spawned for `POST /api/run`.
    #[serde(default = "default_runner_program")]
    pub runner_program: String,
    /// Arguments placed before the task description.
    #[serde(default = "default_runner_args")]
    pub runner_args: Vec<String>,
    /// Working directory of the spawned runner (empty = inherit).
    #[serde(default)]
    pub runner_cwd: String,
    /// Description used when a run request carries none.
    #[serde(default = "default_description")]
    pub default_description: String,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            runner_program: default_runner_program(),
            runner_args: default_runner_args(),
            runner_cwd: String::new(),
            default_description: default_description(),
        }
    }
}

fn default_results_dir() -> String {
    "./results".to_string()
}

fn default_runner_program() -> String {
    "python".to_string()
}

fn default_runner_args() -> Vec<String> {
    vec!["scripts/test_run.py".to_string()]
}

fn default_description() -> String {
    "Plan a simple dinner for 4 people: soup, main course and dessert.".to_string()
}
