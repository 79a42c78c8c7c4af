//! Directory tree snapshot nodes.

use serde::{Deserialize, Serialize};

/// One node of a directory tree snapshot.
///
/// `path` is root-relative and `/`-separated; it identifies the node
/// uniquely within a single snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TreeNode {
    /// A directory and its (possibly depth-truncated) children.
    #[serde(rename = "dir")]
    Directory {
        /// Entry name.
        name: String,
        /// Root-relative path.
        path: String,
        /// Children ordered by name.
        children: Vec<TreeNode>,
    },
    /// A regular file.
    #[serde(rename = "file")]
    File {
        /// Entry name.
        name: String,
        /// Root-relative path.
        path: String,
        /// File size in bytes.
        #[serde(rename = "size")]
        size_bytes: u64,
    },
}

impl TreeNode {
    /// Entry name.
    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Root-relative path.
    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path, .. } | Self::File { path, .. } => path,
        }
    }

    /// Whether this node is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::Directory { children, .. } => children,
            Self::File { .. } => &[],
        }
    }
}

/// Response body of a tree request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Absolute path of the workspace root the snapshot was taken under.
    pub root: String,
    /// Top-level nodes.
    pub tree: Vec<TreeNode>,
}
