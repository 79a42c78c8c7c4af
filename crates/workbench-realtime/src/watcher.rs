//! Static asset watcher feeding the reload hub.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use workbench_core::error::{AppError, ErrorKind};
use workbench_core::result::AppResult;

use crate::hub::ReloadHub;

/// Watches a directory tree and broadcasts a reload when a matching file changes.
///
/// Watching stops when the value is dropped.
pub struct AssetWatcher {
    dir: PathBuf,
    _watcher: RecommendedWatcher,
}

impl std::fmt::Debug for AssetWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetWatcher").field("dir", &self.dir).finish()
    }
}

impl AssetWatcher {
    /// Start watching `dir` recursively for changes to files with one of `extensions`.
    pub fn start(dir: impl AsRef<Path>, extensions: Vec<String>, hub: ReloadHub) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !is_content_change(&event.kind) {
                    return;
                }
                if let Some(path) = event.paths.iter().find(|p| has_extension(p, &extensions)) {
                    hub.notify_reload(path.display().to_string());
                }
            }
            Err(e) => tracing::warn!(error = %e, "Asset watch error"),
        })
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to create asset watcher", e))?;

        watcher.watch(&dir, RecursiveMode::Recursive).map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Failed to watch directory: {}", dir.display()),
                e,
            )
        })?;

        tracing::info!(dir = %dir.display(), "Watching static assets for changes");

        Ok(Self {
            dir,
            _watcher: watcher,
        })
    }

    /// Directory being watched.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}
