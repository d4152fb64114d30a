//! Error types for the Docker CLI
//!
//! This module defines the error types used throughout the client. Uses
//! `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.
//!
//! Plugin resolution errors carry an explicit [`ErrorKind`] so callers can
//! branch on *why* a plugin could not be used without inspecting messages.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Classification of a plugin resolution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No matching candidate, invalid name syntax, or (for execution) an
    /// invalid first candidate.
    NotFound,
    /// The candidate could not be started, exited non-zero, or printed
    /// metadata that failed to decode.
    InvalidCandidate,
    /// The logical name collides with a builtin command.
    NameConflict,
    /// A plugin directory could not be listed for a reason other than not
    /// existing.
    Filesystem,
}

/// Errors produced while discovering, validating and resolving CLI plugins.
#[derive(Error, Debug, Clone)]
pub enum PluginError {
    /// No plugin with this name could be run.
    #[error("Error: No such CLI plugin: {0}")]
    NotFound(String),

    /// The candidate failed validation.
    #[error("{0}")]
    InvalidCandidate(String),

    /// The plugin name is already taken by a builtin command.
    #[error("plugin {0:?} duplicates builtin command")]
    NameConflict(String),

    /// Scanning a plugin directory failed.
    #[error("failed to read plugin directory {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl PluginError {
    /// The kind of failure, for callers that branch on it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PluginError::NotFound(_) => ErrorKind::NotFound,
            PluginError::InvalidCandidate(_) => ErrorKind::InvalidCandidate,
            PluginError::NameConflict(_) => ErrorKind::NameConflict,
            PluginError::Filesystem { .. } => ErrorKind::Filesystem,
        }
    }

    /// Wrap an I/O error raised while scanning `path`.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PluginError::Filesystem {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Whether this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

// io::Error has no equality; two errors are equal when kind and message agree.
impl PartialEq for PluginError {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.to_string() == other.to_string()
    }
}

/// The primary error type for client operations outside plugin resolution.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration-related errors (unreadable or malformed config.json, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Plugin resolution errors
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

/// A specialized `Result` type for client operations.
pub type Result<T> = std::result::Result<T, CliError>;
