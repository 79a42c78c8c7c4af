//! The network boundary of the client.

use async_trait::async_trait;

use workbench_core::result::AppResult;
use workbench_core::types::{
    FileContent, FolderListing, PathReceipt, RootInfo, RunAck, TaskArtifacts, TaskList,
    TreeSnapshot, WriteReceipt,
};

/// Everything the client asks of the server.
///
/// Implementations map transport failures to `ErrorKind::Transport` and
/// server-side rejections to the kind the server reported.
#[async_trait]
pub trait WorkspaceBackend: Send + Sync {
    /// Fetch a depth-bounded snapshot of the directory at `path`.
    async fn fetch_tree(&self, path: &str, depth: u32) -> AppResult<TreeSnapshot>;

    /// Read a whole file.
    async fn read_file(&self, path: &str) -> AppResult<FileContent>;

    /// Create or overwrite a file.
    async fn write_file(&self, path: &str, content: &str) -> AppResult<WriteReceipt>;

    /// Delete a file.
    async fn delete_file(&self, path: &str) -> AppResult<PathReceipt>;

    /// Create a directory.
    async fn mkdir(&self, path: &str) -> AppResult<PathReceipt>;

    /// List directories below the base directory.
    async fn browse(&self, path: &str) -> AppResult<FolderListing>;

    /// Current workspace root.
    async fn get_root(&self) -> AppResult<RootInfo>;

    /// Switch the workspace root.
    async fn set_root(&self, root: &str) -> AppResult<RootInfo>;

    /// List known tasks.
    async fn list_tasks(&self) -> AppResult<TaskList>;

    /// Fetch the artifacts of one task.
    async fn get_task(&self, id: &str) -> AppResult<TaskArtifacts>;

    /// Start a task run.
    async fn run_task(&self, description: &str) -> AppResult<RunAck>;
}
