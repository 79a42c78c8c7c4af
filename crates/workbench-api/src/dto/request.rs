//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query string carrying a root-relative path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathQuery {
    /// Root-relative path.
    pub path: Option<String>,
}

impl PathQuery {
    /// The path, or a validation error naming the missing parameter.
    pub fn required(&self) -> Result<&str, workbench_core::AppError> {
        match self.path.as_deref() {
            Some(path) if !path.trim().is_empty() => Ok(path),
            _ => Err(workbench_core::AppError::validation("path is required")),
        }
    }
}

/// Query string for tree snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeQuery {
    /// Directory to list; the root when absent.
    pub path: Option<String>,
    /// Depth limit; the configured default when absent.
    pub depth: Option<u32>,
}

/// Save file request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveFileRequest {
    /// Root-relative file path.
    #[validate(
        required(message = "path is required"),
        length(min = 1, message = "path is required")
    )]
    pub path: Option<String>,
    /// Full new content. May be empty.
    #[validate(required(message = "content is required"))]
    pub content: Option<String>,
}

/// Create directory request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MkdirRequest {
    /// Root-relative directory path.
    #[validate(
        required(message = "path is required"),
        length(min = 1, message = "path is required")
    )]
    pub path: Option<String>,
}

/// Root switch request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RootRequest {
    /// New root, relative to the base directory.
    #[validate(required(message = "root is required"))]
    pub root: Option<String>,
}

/// Task run request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RunRequest {
    /// Task description; the configured default when empty.
    #[serde(default, alias = "taskDescription")]
    #[validate(length(max = 10000, message = "description is too long"))]
    pub description: String,
}
