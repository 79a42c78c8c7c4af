//! Sandbox boundary for client-supplied paths.
//!
//! Every path that arrives from a client is resolved here before any
//! filesystem call is made. A path is accepted only if, after `.`/`..`
//! normalization and canonicalization of its deepest existing ancestor,
//! it still lies at or below the canonical root. The prefix test is
//! component-wise, so a sibling such as `/srv/root2` never passes for the
//! root `/srv/root`.

use std::io;
use std::path::{Component, Path, PathBuf};

use workbench_core::error::{AppError, ErrorKind};
use workbench_core::result::AppResult;

/// Resolves root-relative paths and rejects anything outside the root.
#[derive(Debug, Clone)]
pub struct PathGuard {
    /// Canonical root directory.
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for an existing directory.
    pub fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                AppError::not_found(format!("Root directory does not exist: {}", root.display()))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to canonicalize root: {}", root.display()),
                    e,
                )
            }
        })?;

        if !canonical.is_dir() {
            return Err(AppError::invalid_target(format!(
                "Root is not a directory: {}",
                root.display()
            )));
        }

        Ok(Self { root: canonical })
    }

    /// Canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a client-supplied path to an absolute path inside the root.
    ///
    /// An empty (or all-whitespace) path or `"."` resolves to the root
    /// itself. Any other path is joined verbatim, so names with surrounding
    /// whitespace address exactly the entry listed in the tree. The target
    /// does not need to exist.
    pub fn resolve(&self, relative: &str) -> AppResult<PathBuf> {
        let trimmed = relative.trim();
        if trimmed.is_empty() || trimmed == "." {
            return Ok(self.root.clone());
        }

        let normalized = lexical_normalize(&self.root.join(relative));
        let resolved = canonicalize_existing_prefix(&normalized)?;

        if !resolved.starts_with(&self.root) {
            tracing::warn!(path = %relative, "Rejected path outside workspace root");
            return Err(AppError::path_escape(format!(
                "Path escapes the workspace root: {relative}"
            )));
        }

        Ok(resolved)
    }

    /// Slash-separated path of `absolute` relative to the root.
    ///
    /// Returns an empty string for the root itself.
    pub fn relative_of(&self, absolute: &Path) -> String {
        absolute
            .strip_prefix(&self.root)
            .map(|rel| {
                rel.components()
                    .filter_map(|c| match c {
                        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default()
    }
}

/// Resolve `relative` against `root` in one call.
pub fn resolve(root: impl AsRef<Path>, relative: &str) -> AppResult<PathBuf> {
    PathGuard::new(root)?.resolve(relative)
}

/// Collapse `.` and `..` components without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pops past the filesystem root.
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize the deepest existing ancestor and re-append the rest.
fn canonicalize_existing_prefix(path: &Path) -> AppResult<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut missing = Vec::new();

    while std::fs::symlink_metadata(&existing).is_err() {
        match existing.file_name() {
            Some(name) => missing.push(name.to_os_string()),
            None => break,
        }
        if !existing.pop() {
            break;
        }
    }

    let mut resolved = existing.canonicalize().map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to canonicalize path: {}", existing.display()),
            e,
        )
    })?;

    for name in missing.into_iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}
