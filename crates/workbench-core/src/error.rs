//! Unified application error types for Workbench.
//!
//! Every crate maps its internal failures into [`AppError`] so they
//! propagate through the `?` operator and reach the HTTP boundary (or the
//! client status line) with a stable [`ErrorKind`].

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A client-supplied path resolved outside the sandbox root.
    PathEscape,
    /// The requested file, directory or task does not exist.
    NotFound,
    /// The path exists but is the wrong kind of node for the operation.
    InvalidTarget,
    /// Something already exists at the path.
    AlreadyExists,
    /// The payload exceeds a configured size ceiling.
    TooLarge,
    /// The backend could not be reached.
    Transport,
    /// Request input was missing or malformed.
    Validation,
    /// A filesystem I/O error occurred.
    Storage,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PathEscape => "PATH_ESCAPE",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::TooLarge => "TOO_LARGE",
            Self::Transport => "TRANSPORT",
            Self::Validation => "VALIDATION",
            Self::Storage => "STORAGE",
            Self::Serialization => "SERIALIZATION",
            Self::Configuration => "CONFIGURATION",
            Self::Internal => "INTERNAL",
        }
    }

    /// Parse a code produced by [`ErrorKind::code`].
    pub fn from_code(code: &str) -> Option<Self> {
        let kind = match code {
            "PATH_ESCAPE" => Self::PathEscape,
            "NOT_FOUND" => Self::NotFound,
            "INVALID_TARGET" => Self::InvalidTarget,
            "ALREADY_EXISTS" => Self::AlreadyExists,
            "TOO_LARGE" => Self::TooLarge,
            "TRANSPORT" => Self::Transport,
            "VALIDATION" => Self::Validation,
            "STORAGE" => Self::Storage,
            "SERIALIZATION" => Self::Serialization,
            "CONFIGURATION" => Self::Configuration,
            "INTERNAL" => Self::Internal,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout Workbench.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a sandbox escape error.
    pub fn path_escape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathEscape, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a wrong-node-kind error.
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTarget, message)
    }

    /// Create an already-exists error.
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    /// Create a size-ceiling error.
    pub fn too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TooLarge, message)
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns `true` if this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_parser() {
        for kind in [
            ErrorKind::PathEscape,
            ErrorKind::NotFound,
            ErrorKind::InvalidTarget,
            ErrorKind::AlreadyExists,
            ErrorKind::TooLarge,
            ErrorKind::Transport,
            ErrorKind::Internal,
        ] {
            assert_eq!(ErrorKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ErrorKind::from_code("BOGUS"), None);
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: AppError = std::io::Error::other("disk on fire").into();
        assert!(err.is(ErrorKind::Storage));
        assert!(err.to_string().starts_with("STORAGE: "));
    }
}
