//! Depth-bounded directory tree snapshots.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use workbench_core::error::{AppError, ErrorKind};
use workbench_core::result::AppResult;
use workbench_core::types::TreeNode;

/// Walks a directory into an ordered [`TreeNode`] snapshot.
///
/// Entries are sorted by name (byte-wise, case-sensitive) with files and
/// directories interleaved. Names in the exclusion set are skipped at every
/// level. Symlinks and special files are neither files nor directories here
/// and are skipped as well.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    /// Entry names never listed.
    exclude: HashSet<String>,
}

impl TreeBuilder {
    /// Create a builder with the given exclusion set.
    pub fn new<I, S>(exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether an entry name is excluded from listings.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }

    /// Build the snapshot of `dir` with root-relative paths starting at `dir`.
    pub fn build(&self, dir: &Path, depth: u32) -> AppResult<Vec<TreeNode>> {
        self.build_under(dir, "", depth)
    }

    /// Build the snapshot of `dir`, prefixing every node path with `rel_base`.
    ///
    /// Entries of `dir` are always listed; directories at depth 0 get an
    /// empty children list instead of being probed.
    pub fn build_under(&self, dir: &Path, rel_base: &str, depth: u32) -> AppResult<Vec<TreeNode>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read directory: {}", dir.display()),
                e,
            )
        })?;

        let mut listed = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.is_excluded(&name) {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            listed.push((name, file_type, entry.path()));
        }
        listed.sort_by(|a, b| a.0.cmp(&b.0));

        let mut nodes = Vec::with_capacity(listed.len());
        for (name, file_type, full_path) in listed {
            let path = join_relative(rel_base, &name);

            if file_type.is_dir() {
                let children = if depth == 0 {
                    Vec::new()
                } else {
                    self.build_under(&full_path, &path, depth - 1)
                        .unwrap_or_else(|e| {
                            tracing::warn!(
                                dir = %full_path.display(),
                                error = %e,
                                "Failed to read directory, listing it as empty"
                            );
                            Vec::new()
                        })
                };
                nodes.push(TreeNode::Directory {
                    name,
                    path,
                    children,
                });
            } else if file_type.is_file() {
                let size_bytes = match fs::metadata(&full_path) {
                    Ok(meta) => meta.len(),
                    Err(_) => continue,
                };
                nodes.push(TreeNode::File {
                    name,
                    path,
                    size_bytes,
                });
            }
        }

        Ok(nodes)
    }
}

/// Join a relative base and an entry name with `/`.
pub(crate) fn join_relative(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}
