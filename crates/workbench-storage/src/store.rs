//! File and directory primitives confined to one workspace root.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use workbench_core::config::WorkspaceConfig;
use workbench_core::error::{AppError, ErrorKind};
use workbench_core::result::AppResult;
use workbench_core::types::{FileContent, PathReceipt, TreeSnapshot, WriteReceipt};

use crate::guard::PathGuard;
use crate::tree::{TreeBuilder, join_relative};

/// Size ceilings enforced by a [`FileStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    /// Largest file that may be read, in bytes.
    pub max_read_bytes: u64,
    /// Largest payload that may be written, in bytes.
    pub max_write_bytes: u64,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_read_bytes: 200 * 1024,
            max_write_bytes: 1024 * 1024,
        }
    }
}

/// A direct child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildEntry {
    /// Entry name.
    pub name: String,
    /// Root-relative path.
    pub path: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
}

/// Read/write/delete/mkdir primitives over a sandboxed root.
///
/// Every operation resolves its path through the [`PathGuard`] before the
/// filesystem is touched.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Sandbox boundary.
    guard: PathGuard,
    /// Snapshot walker sharing the exclusion set.
    tree: TreeBuilder,
    /// Size ceilings.
    limits: StoreLimits,
}

impl FileStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl AsRef<Path>, tree: TreeBuilder, limits: StoreLimits) -> AppResult<Self> {
        Ok(Self {
            guard: PathGuard::new(root)?,
            tree,
            limits,
        })
    }

    /// Create a store from the workspace configuration section.
    pub fn from_config(root: impl AsRef<Path>, config: &WorkspaceConfig) -> AppResult<Self> {
        Self::new(
            root,
            TreeBuilder::new(config.exclude.iter().cloned()),
            StoreLimits {
                max_read_bytes: config.max_read_bytes,
                max_write_bytes: config.max_write_bytes,
            },
        )
    }

    /// A store with the same exclusions and limits over a different root.
    pub fn with_root(&self, root: impl AsRef<Path>) -> AppResult<Self> {
        Self::new(root, self.tree.clone(), self.limits)
    }

    /// Canonical root directory.
    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    /// The sandbox boundary of this store.
    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Size ceilings of this store.
    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    /// Read a whole UTF-8 file.
    pub async fn read(&self, path: &str) -> AppResult<FileContent> {
        let target = self.guard.resolve(path)?;
        let meta = fs::metadata(&target)
            .await
            .map_err(|e| not_found_or_storage(e, "File does not exist", path))?;

        if !meta.is_file() {
            return Err(AppError::not_found(format!("File does not exist: {path}")));
        }
        if meta.len() > self.limits.max_read_bytes {
            return Err(AppError::too_large(format!(
                "File is too large to open ({} bytes, limit {})",
                meta.len(),
                self.limits.max_read_bytes
            )));
        }

        let bytes = fs::read(&target)
            .await
            .map_err(|e| not_found_or_storage(e, "File does not exist", path))?;
        let size_bytes = bytes.len() as u64;
        let content = String::from_utf8(bytes)
            .map_err(|_| AppError::invalid_target(format!("File is not valid UTF-8: {path}")))?;

        debug!(path, bytes = size_bytes, "Read file");
        Ok(FileContent {
            path: path.to_string(),
            size_bytes,
            content,
        })
    }

    /// Create or overwrite a file, creating missing parent directories.
    pub async fn write(&self, path: &str, content: &str) -> AppResult<WriteReceipt> {
        if content.len() as u64 > self.limits.max_write_bytes {
            return Err(AppError::too_large(format!(
                "Content is too large to save ({} bytes, limit {})",
                content.len(),
                self.limits.max_write_bytes
            )));
        }

        let target = self.guard.resolve(path)?;
        if target == self.root() {
            return Err(AppError::invalid_target("Cannot write to the workspace root"));
        }
        if let Ok(meta) = fs::metadata(&target).await {
            if meta.is_dir() {
                return Err(AppError::invalid_target(format!(
                    "Path is a directory: {path}"
                )));
            }
        }

        if let Some(parent) = target.parent() {
            self.ensure_directory(parent, path).await?;
        }

        fs::write(&target, content.as_bytes()).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write file: {path}"), e)
        })?;
        let size_bytes = fs::metadata(&target).await?.len();

        debug!(path, bytes = size_bytes, "Wrote file");
        Ok(WriteReceipt {
            path: path.to_string(),
            size_bytes,
        })
    }

    /// Delete a single file. Directories are refused.
    pub async fn delete(&self, path: &str) -> AppResult<PathReceipt> {
        let target = self.guard.resolve(path)?;
        let meta = fs::symlink_metadata(&target)
            .await
            .map_err(|e| not_found_or_storage(e, "File does not exist", path))?;

        if meta.is_dir() {
            return Err(AppError::invalid_target(format!(
                "Cannot delete a directory as a file: {path}"
            )));
        }

        fs::remove_file(&target).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to delete file: {path}"), e)
        })?;

        debug!(path, "Deleted file");
        Ok(PathReceipt {
            path: path.to_string(),
        })
    }

    /// Create a directory and any missing intermediates.
    pub async fn mkdir(&self, path: &str) -> AppResult<PathReceipt> {
        let target = self.guard.resolve(path)?;
        if fs::symlink_metadata(&target).await.is_ok() {
            return Err(AppError::already_exists(format!("Path already exists: {path}")));
        }
        if let Some(parent) = target.parent() {
            self.ensure_directory(parent, path).await?;
        }

        fs::create_dir(&target).await.map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                AppError::already_exists(format!("Path already exists: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {path}"),
                    e,
                )
            }
        })?;

        debug!(path, "Created directory");
        Ok(PathReceipt {
            path: path.to_string(),
        })
    }

    /// List direct children of a directory, honoring the exclusion set.
    pub async fn list_children(&self, path: &str) -> AppResult<Vec<ChildEntry>> {
        let target = self.existing_directory(path).await?;
        let rel_base = self.guard.relative_of(&target);

        let mut reader = fs::read_dir(&target).await?;
        let mut children = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.tree.is_excluded(&name) {
                continue;
            }
            let Ok(file_type) = entry.file_type().await else {
                continue;
            };
            if !file_type.is_dir() && !file_type.is_file() {
                continue;
            }
            children.push(ChildEntry {
                path: join_relative(&rel_base, &name),
                name,
                is_directory: file_type.is_dir(),
            });
        }
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    /// Build a depth-bounded snapshot of the directory at `path`.
    pub async fn tree(&self, path: &str, depth: u32) -> AppResult<TreeSnapshot> {
        let target = self.existing_directory(path).await?;
        let rel_base = self.guard.relative_of(&target);
        let builder = self.tree.clone();
        let root = self.root().display().to_string();

        let tree = tokio::task::spawn_blocking(move || builder.build_under(&target, &rel_base, depth))
            .await
            .map_err(|e| AppError::internal(format!("Tree walk panicked: {e}")))??;

        Ok(TreeSnapshot { root, tree })
    }

    /// Resolve `path` and require an existing directory.
    async fn existing_directory(&self, path: &str) -> AppResult<PathBuf> {
        let target = self.guard.resolve(path)?;
        match fs::metadata(&target).await {
            Ok(meta) if meta.is_dir() => Ok(target),
            Ok(_) => Err(AppError::not_found(format!("Directory does not exist: {path}"))),
            Err(e) => Err(not_found_or_storage(e, "Directory does not exist", path)),
        }
    }

    /// Create `dir` (and intermediates) unless an ancestor is a file.
    async fn ensure_directory(&self, dir: &Path, requested: &str) -> AppResult<()> {
        for ancestor in dir.ancestors() {
            if let Ok(meta) = fs::metadata(ancestor).await {
                if meta.is_dir() {
                    break;
                }
                return Err(AppError::invalid_target(format!(
                    "Parent path is a file: {} (for {requested})",
                    self.guard.relative_of(ancestor)
                )));
            }
            if ancestor == self.root() {
                break;
            }
        }

        fs::create_dir_all(dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create parent directory for: {requested}"),
                e,
            )
        })
    }
}

fn not_found_or_storage(err: io::Error, message: &str, path: &str) -> AppError {
    if err.kind() == io::ErrorKind::NotFound {
        AppError::not_found(format!("{message}: {path}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("{message}: {path}"), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workbench_core::config::workspace::DEFAULT_EXCLUDES;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("a/x.txt"), "0123456789").unwrap();
        let store = FileStore::new(
            dir.path(),
            TreeBuilder::new(DEFAULT_EXCLUDES),
            StoreLimits::default(),
        )
        .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_write_then_read_returns_same_content() {
        let (_dir, store) = store();
        for content in ["", "hello", "zażółć gęślą jaźń\n", "line1\nline2\n"] {
            let receipt = store.write("notes/today.md", content).await.unwrap();
            assert_eq!(receipt.size_bytes, content.len() as u64);

            let read = store.read("notes/today.md").await.unwrap();
            assert_eq!(read.content, content);
            assert_eq!(read.size_bytes, content.len() as u64);
        }
    }

    #[tokio::test]
    async fn test_trailing_space_names_are_distinct_files() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("notes"), "without").unwrap();
        std::fs::write(dir.path().join("notes "), "with space").unwrap();

        let tree = store.tree("", 1).await.unwrap();
        let paths: Vec<&str> = tree.tree.iter().map(|n| n.path()).collect();
        assert_eq!(paths, vec!["a", "notes", "notes "]);

        assert_eq!(store.read("notes ").await.unwrap().content, "with space");
        store.write("notes ", "edited").await.unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("notes ")).unwrap(), "edited");
        assert_eq!(std::fs::read_to_string(dir.path().join("notes")).unwrap(), "without");

        store.delete("notes ").await.unwrap();
        assert!(!dir.path().join("notes ").exists());
        assert!(dir.path().join("notes").exists());
    }

    #[tokio::test]
    async fn test_read_missing_or_directory_is_not_found() {
        let (_dir, store) = store();
        assert_eq!(store.read("missing.txt").await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(store.read("a").await.unwrap_err().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_read_above_ceiling_is_refused_whole() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("big.log"), vec![b'x'; 200 * 1024 + 1]).unwrap();
        std::fs::write(dir.path().join("edge.log"), vec![b'x'; 200 * 1024]).unwrap();

        assert_eq!(store.read("big.log").await.unwrap_err().kind, ErrorKind::TooLarge);
        assert_eq!(store.read("edge.log").await.unwrap().size_bytes, 200 * 1024);
    }

    #[tokio::test]
    async fn test_write_creates_parents_unless_parent_is_file() {
        let (dir, store) = store();

        store.write("newdir/f.txt", "").await.unwrap();
        assert!(dir.path().join("newdir").is_dir());

        std::fs::write(dir.path().join("blocker"), "file").unwrap();
        let err = store.write("blocker/f.txt", "x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTarget);
        let err = store.write("blocker/deeper/f.txt", "x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTarget);
    }

    #[tokio::test]
    async fn test_write_refuses_directory_target() {
        let (dir, store) = store();
        let err = store.write("a", "oops").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTarget);
        assert!(dir.path().join("a").is_dir());
    }

    #[tokio::test]
    async fn test_write_above_ceiling_is_refused() {
        let (_dir, store) = store();
        let big = "x".repeat(1024 * 1024 + 1);
        assert_eq!(store.write("big.txt", &big).await.unwrap_err().kind, ErrorKind::TooLarge);
    }

    #[tokio::test]
    async fn test_operations_reject_escapes() {
        let (_dir, store) = store();
        assert_eq!(store.read("../x").await.unwrap_err().kind, ErrorKind::PathEscape);
        assert_eq!(store.write("../x", "x").await.unwrap_err().kind, ErrorKind::PathEscape);
        assert_eq!(store.delete("../x").await.unwrap_err().kind, ErrorKind::PathEscape);
        assert_eq!(store.mkdir("../x").await.unwrap_err().kind, ErrorKind::PathEscape);
        assert_eq!(store.tree("..", 1).await.unwrap_err().kind, ErrorKind::PathEscape);
    }

    #[tokio::test]
    async fn test_delete_semantics() {
        let (dir, store) = store();
        assert_eq!(store.delete("nope.txt").await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(store.delete("a").await.unwrap_err().kind, ErrorKind::InvalidTarget);

        store.delete("a/x.txt").await.unwrap();
        assert!(!dir.path().join("a/x.txt").exists());
    }

    #[tokio::test]
    async fn test_mkdir_semantics() {
        let (dir, store) = store();
        store.mkdir("one/two/three").await.unwrap();
        assert!(dir.path().join("one/two/three").is_dir());

        assert_eq!(store.mkdir("one/two").await.unwrap_err().kind, ErrorKind::AlreadyExists);
        assert_eq!(store.mkdir("a/x.txt").await.unwrap_err().kind, ErrorKind::AlreadyExists);
        assert_eq!(store.mkdir("").await.unwrap_err().kind, ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_list_children_sorted_and_filtered() {
        let (dir, store) = store();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::create_dir_all(dir.path().join("B")).unwrap();
        std::fs::write(dir.path().join("c.txt"), "c").unwrap();

        let children = store.list_children("").await.unwrap();
        let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "a", "c.txt"]);
        assert!(children[0].is_directory);
        assert!(!children[2].is_directory);

        let nested = store.list_children("a").await.unwrap();
        assert_eq!(nested[0].path, "a/x.txt");
    }

    #[tokio::test]
    async fn test_tree_of_subdirectory_and_missing_directory() {
        let (_dir, store) = store();
        let snapshot = store.tree("a", 4).await.unwrap();
        assert_eq!(snapshot.root, store.root().display().to_string());
        assert_eq!(snapshot.tree[0].path(), "a/x.txt");

        assert_eq!(store.tree("missing", 4).await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(store.tree("a/x.txt", 4).await.unwrap_err().kind, ErrorKind::NotFound);
    }
}
