//! Wire types shared by the server and the client.

pub mod file;
pub mod task;
pub mod tree;

pub use file::{FileContent, FolderEntry, FolderListing, PathReceipt, RootInfo, WriteReceipt};
pub use task::{RunAck, TaskArtifacts, TaskList, TaskSummary};
pub use tree::{TreeNode, TreeSnapshot};
