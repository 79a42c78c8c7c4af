//! Response DTOs not shared with the client crate.

use serde::{Deserialize, Serialize};

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Server status with task and reload details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `ok`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Current workspace root.
    pub root: String,
    /// Configured results directory.
    pub results_dir: String,
    /// Whether the results directory exists.
    pub results_exist: bool,
    /// Open reload streams.
    pub reload_clients: usize,
}
