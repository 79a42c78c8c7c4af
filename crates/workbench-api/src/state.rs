//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use workbench_core::config::AppConfig;
use workbench_core::result::AppResult;
use workbench_realtime::ReloadHub;
use workbench_storage::FileStore;
use workbench_worker::TaskGateway;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Workspace ────────────────────────────────────────────
    /// File store over the current root, swapped on root switch
    store: Arc<RwLock<Arc<FileStore>>>,
    /// File store over the base directory the root may be chosen from
    pub base: Arc<FileStore>,

    // ── Tasks & Realtime ─────────────────────────────────────
    /// Task gateway
    pub tasks: Arc<dyn TaskGateway>,
    /// Reload signal hub
    pub reload: ReloadHub,

    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    /// Build the state from configuration and a task gateway.
    pub fn new(config: AppConfig, tasks: Arc<dyn TaskGateway>) -> AppResult<Self> {
        let store = FileStore::from_config(&config.workspace.root, &config.workspace)?;
        let base = store.with_root(config.workspace.effective_base_root())?;
        let reload = ReloadHub::new(config.reload.channel_buffer_size);

        tracing::info!(
            root = %store.root().display(),
            base = %base.root().display(),
            "Workspace initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(Arc::new(store))),
            base: Arc::new(base),
            tasks,
            reload,
            started_at: Instant::now(),
        })
    }

    /// The store over the current root.
    pub async fn store(&self) -> Arc<FileStore> {
        Arc::clone(&*self.store.read().await)
    }

    /// Replace the current root's store.
    pub async fn replace_store(&self, store: FileStore) -> Arc<FileStore> {
        let store = Arc::new(store);
        *self.store.write().await = Arc::clone(&store);
        store
    }
}
