//! Store and resolver error types.

use discovery_core::{ErrorKind, Interrupted, InvalidPath, InvalidVersion};

/// Errors that can occur while resolving a directory.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No packages match the directory at the requested version.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Malformed directory path.
    #[error(transparent)]
    InvalidPath(#[from] InvalidPath),

    /// Malformed version.
    #[error(transparent)]
    InvalidVersion(#[from] InvalidVersion),

    /// Any other unacceptable argument.
    #[error("invalid argument: {detail}")]
    InvalidArgument { detail: String },

    /// Two modules of equal path length both own the directory.
    #[error("directory '{dir_path}' is owned by several modules of equal length: {modules:?}")]
    AmbiguousModule {
        dir_path: String,
        modules: Vec<String>,
    },

    /// Inconsistent rows or other unexpected store failure.
    #[error("internal store error: {detail}")]
    Internal { detail: String },

    /// Malformed store snapshot.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// I/O error reading a snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The execution context ended first.
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl StoreError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::InvalidPath(_)
            | StoreError::InvalidVersion(_)
            | StoreError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            StoreError::AmbiguousModule { .. } => ErrorKind::Ambiguous,
            StoreError::Internal { .. } | StoreError::Snapshot(_) | StoreError::Io(_) => {
                ErrorKind::Internal
            }
            StoreError::Interrupted(Interrupted::Canceled) => ErrorKind::Canceled,
            StoreError::Interrupted(Interrupted::DeadlineExceeded) => ErrorKind::DeadlineExceeded,
        }
    }

    /// Report whether the error means "does not exist".
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
