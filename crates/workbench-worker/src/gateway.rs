//! Task gateway contract.

use async_trait::async_trait;

use workbench_core::result::AppResult;
use workbench_core::types::{RunAck, TaskArtifacts, TaskList};

/// Narrow interface to the external task-execution collaborator.
#[async_trait]
pub trait TaskGateway: Send + Sync + std::fmt::Debug {
    /// List known tasks, newest first.
    async fn list(&self) -> AppResult<TaskList>;

    /// Fetch the named artifacts of one task.
    async fn get(&self, id: &str) -> AppResult<TaskArtifacts>;

    /// Start a run and return immediately; completion is not reported.
    async fn run(&self, description: &str) -> AppResult<RunAck>;
}
