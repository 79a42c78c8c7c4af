//! Sandboxed workspace configuration.

use serde::{Deserialize, Serialize};

/// Directory names skipped by tree walks and folder listings.
pub const DEFAULT_EXCLUDES: [&str; 5] = [".git", "node_modules", "venv", "__pycache__", "results"];

/// Workspace (sandbox root) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Initial sandbox root served to clients.
    #[serde(default = "default_root")]
    pub root: String,
    /// Directory that bounds root switching and the folder browser.
    /// Falls back to `root` when empty.
    #[serde(default)]
    pub base_root: String,
    /// Default depth for tree requests that omit `depth`.
    #[serde(default = "default_depth")]
    pub default_depth: u32,
    /// Largest file, in bytes, that may be read back to a client.
    #[serde(default = "default_max_read")]
    pub max_read_bytes: u64,
    /// Largest payload, in bytes, that may be written.
    #[serde(default = "default_max_write")]
    pub max_write_bytes: u64,
    /// Entry names excluded from tree walks and listings.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl WorkspaceConfig {
    /// The directory root switching is confined to.
    pub fn effective_base_root(&self) -> &str {
        if self.base_root.is_empty() {
            &self.root
        } else {
            &self.base_root
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            base_root: String::new(),
            default_depth: default_depth(),
            max_read_bytes: default_max_read(),
            max_write_bytes: default_max_write(),
            exclude: default_exclude(),
        }
    }
}

fn default_root() -> String {
    ".".to_string()
}

fn default_depth() -> u32 {
    4
}

fn default_max_read() -> u64 {
    200 * 1024
}

fn default_max_write() -> u64 {
    1024 * 1024
}

fn default_exclude() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}
