//! Error kinds shared by every discovery component.
//!
//! Each crate keeps its own error enum, but all of them classify into an
//! [`ErrorKind`] so callers can branch on absence, cancellation and so on
//! without inspecting messages.

use std::fmt;

/// Classification of a discovery failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The module, version or directory does not exist.
    NotFound,
    /// The caller supplied a malformed module path, directory or version.
    InvalidArgument,
    /// The registry answered with something the protocol does not allow.
    ProtocolViolation,
    /// Network or connection failure, or a server-side error status.
    Transport,
    /// The execution context was canceled.
    Canceled,
    /// The execution context's deadline passed.
    DeadlineExceeded,
    /// More than one module owns a directory with equal specificity.
    Ambiguous,
    /// Unexpected failure in the metadata store.
    Internal,
}

impl ErrorKind {
    /// Short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::ProtocolViolation => "protocol violation",
            ErrorKind::Transport => "transport",
            ErrorKind::Canceled => "canceled",
            ErrorKind::DeadlineExceeded => "deadline exceeded",
            ErrorKind::Ambiguous => "ambiguous",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version string that is neither `latest` nor a `v`-prefixed semantic version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version {version:?}: {detail}")]
pub struct InvalidVersion {
    pub version: String,
    pub detail: String,
}

impl InvalidVersion {
    pub(crate) fn new(version: &str, detail: impl Into<String>) -> Self {
        InvalidVersion {
            version: version.to_string(),
            detail: detail.into(),
        }
    }
}

/// A malformed module or directory path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed path {path:?}: {detail}")]
pub struct InvalidPath {
    pub path: String,
    pub detail: String,
}

impl InvalidPath {
    pub(crate) fn new(path: &str, detail: impl Into<String>) -> Self {
        InvalidPath {
            path: path.to_string(),
            detail: detail.into(),
        }
    }
}
