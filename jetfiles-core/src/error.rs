//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Files Core
//!
//! Every fallible library operation returns `Result<T, AppError>`. Listing
//! failures are deliberately coarse: a missing, unreadable, non-directory or
//! empty root all collapse into [`AppError::NoFilesFound`].

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for all library operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// The root directory could not be listed or held nothing to list.
    #[error("No files found in {path:?}")]
    NoFilesFound { path: PathBuf },

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Background task could not run to completion.
    #[error("Task {task} failed: {reason}")]
    TaskFailed { task: String, reason: String },

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a listing failure for `path`.
    pub fn no_files_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::NoFilesFound { path: path.into() }
    }

    /// Create a task failure error
    pub fn task_failed<S1: Into<String>, S2: Into<String>>(task: S1, reason: S2) -> Self {
        Self::TaskFailed {
            task: task.into(),
            reason: reason.into(),
        }
    }

    /// True for the listing failure that the home screen surfaces as "load failed".
    pub const fn is_listing_failure(&self) -> bool {
        matches!(self, Self::NoFilesFound { .. })
    }
}

// Manual Clone implementation to handle non-Clone fields
impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            Self::NoFilesFound { path } => Self::NoFilesFound { path: path.clone() },
            Self::Config(e) => Self::Other(format!("Config error: {e}")),
            Self::ConfigSerialize(e) => Self::Other(format!("Config error: {e}")),
            Self::ConfigIo { path, source } => Self::ConfigIo {
                path: path.clone(),
                source: io::Error::new(source.kind(), source.to_string()),
            },
            Self::TaskFailed { task, reason } => Self::TaskFailed {
                task: task.clone(),
                reason: reason.clone(),
            },
            Self::Other(msg) => Self::Other(msg.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_failure_classification() {
        assert!(AppError::no_files_found("/nope").is_listing_failure());
        assert!(!AppError::Other("x".into()).is_listing_failure());
    }

    #[test]
    fn test_clone_keeps_config_io_kind() {
        let err = AppError::ConfigIo {
            path: PathBuf::from("/etc/jetfiles/config.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        match err.clone() {
            AppError::ConfigIo { path, source } => {
                assert_eq!(path, PathBuf::from("/etc/jetfiles/config.toml"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected clone: {other:?}"),
        }
    }
}
