//! Error types for census operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during a census.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Directory could not be listed.
    #[error("error reading directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File metadata could not be read.
    #[error("error getting file info for {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A worker pool could not be started.
    #[error("Failed to start worker pool: {message}")]
    WorkerPool { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a directory listing error.
    pub fn read_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Create a file metadata error.
    pub fn metadata(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::PermissionDenied { path }
            | Self::NotFound { path }
            | Self::ReadDir { path, .. }
            | Self::Metadata { path, .. }
            | Self::Io { path, .. }
            | Self::NotADirectory { path } => Some(path),
            Self::InvalidConfig { .. } | Self::WorkerPool { .. } => None,
        }
    }

    /// Kind of failure, for reporting.
    pub fn kind(&self) -> WarningKind {
        match self {
            Self::PermissionDenied { .. } => WarningKind::PermissionDenied,
            Self::Metadata { .. } => WarningKind::MetadataError,
            _ => WarningKind::ReadError,
        }
    }
}

/// Kind of reportable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a directory.
    ReadError,
    /// Error reading file metadata.
    MetadataError,
}

/// Serializable summary of one reportable failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the failure occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of failure.
    pub kind: WarningKind,
}

impl From<&ScanError> for ScanWarning {
    fn from(err: &ScanError) -> Self {
        Self {
            path: err.path().map(|p| p.to_path_buf()).unwrap_or_default(),
            message: err.to_string(),
            kind: err.kind(),
        }
    }
}

/// Aggregated non-fatal errors from a census that still produced results.
#[derive(Debug, Error)]
#[error("encountered {} errors during processing: [{}]", .errors.len(), join_errors(.errors))]
pub struct IncompleteScan {
    errors: Vec<ScanError>,
}

impl IncompleteScan {
    /// Wrap collected errors. Returns `None` when there is nothing to report.
    pub fn from_errors(errors: Vec<ScanError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false; an `IncompleteScan` is never built empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The underlying errors.
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    /// Serializable summaries of the underlying errors.
    pub fn warnings(&self) -> Vec<ScanWarning> {
        self.errors.iter().map(ScanWarning::from).collect()
    }
}

fn join_errors(errors: &[ScanError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));
    }

    #[test]
    fn test_incomplete_scan_empty_is_none() {
        assert!(IncompleteScan::from_errors(Vec::new()).is_none());
    }

    #[test]
    fn test_incomplete_scan_display_lists_causes() {
        let err = IncompleteScan::from_errors(vec![
            ScanError::read_dir("/root/A", std::io::Error::other("bad sector")),
            ScanError::metadata("/root/B/x.txt", std::io::Error::other("stale handle")),
        ])
        .unwrap();

        let msg = err.to_string();
        assert!(msg.starts_with("encountered 2 errors"));
        assert!(msg.contains("/root/A"));
        assert!(msg.contains("bad sector"));
        assert!(msg.contains("stale handle"));
        assert_eq!(err.warnings()[1].kind, WarningKind::MetadataError);
    }

    #[test]
    fn test_incomplete_scan_joins_causes_in_order() {
        let err = IncompleteScan::from_errors(vec![
            ScanError::read_dir("/a", std::io::Error::other("one")),
            ScanError::read_dir("/b", std::io::Error::other("two")),
        ])
        .unwrap();

        assert_eq!(
            err.to_string(),
            "encountered 2 errors during processing: \
             [error reading directory /a: one; error reading directory /b: two]"
        );
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
        assert!(boxed.source().is_none());
    }
}
