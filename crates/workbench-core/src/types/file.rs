//! File and folder payloads.

use serde::{Deserialize, Serialize};

/// Content of a single file as returned by a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Root-relative path as requested.
    pub path: String,
    /// Size in bytes.
    #[serde(rename = "size")]
    pub size_bytes: u64,
    /// UTF-8 content.
    pub content: String,
}

/// Acknowledgement of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
    /// Root-relative path as requested.
    pub path: String,
    /// Size in bytes after the write.
    #[serde(rename = "size")]
    pub size_bytes: u64,
}

/// Acknowledgement of a delete or mkdir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathReceipt {
    /// Root-relative path as requested.
    pub path: String,
}

/// One directory in a folder browser listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    /// Directory name.
    pub name: String,
    /// Path relative to the browsing base.
    pub path: String,
}

/// Folder browser listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderListing {
    /// Listed directory, relative to the browsing base.
    pub path: String,
    /// Child directories ordered by name.
    pub folders: Vec<FolderEntry>,
}

/// Current sandbox root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootInfo {
    /// Absolute path of the root.
    pub root: String,
}
