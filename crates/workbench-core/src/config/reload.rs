//! Static asset hot-reload configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the static asset watcher and its event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadConfig {
    /// Whether the asset watcher is started.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Directory served as static assets and watched for changes.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// File extensions whose changes trigger a reload signal.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Broadcast buffer for pending reload signals per subscriber.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Keep-alive interval for the event stream, in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_seconds: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            public_dir: default_public_dir(),
            extensions: default_extensions(),
            channel_buffer_size: default_channel_buffer(),
            keep_alive_seconds: default_keep_alive(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_public_dir() -> String {
    "./public".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["js".to_string(), "html".to_string()]
}

fn default_channel_buffer() -> usize {
    16
}

fn default_keep_alive() -> u64 {
    15
}
