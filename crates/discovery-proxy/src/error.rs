//! Proxy client error types.

use discovery_core::{ErrorKind, Interrupted, InvalidPath, InvalidVersion};

/// Errors that can occur while talking to a module proxy.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The proxy reported the module or version as absent (404 or 410).
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Malformed module path.
    #[error(transparent)]
    InvalidPath(#[from] InvalidPath),

    /// Malformed version.
    #[error(transparent)]
    InvalidVersion(#[from] InvalidVersion),

    /// Any other argument the operation cannot accept.
    #[error("invalid argument: {detail}")]
    InvalidArgument { detail: String },

    /// The proxy answered with a body or status the protocol does not allow.
    #[error("protocol violation for {resource}: {detail}")]
    ProtocolViolation { resource: String, detail: String },

    /// Connection failure or server-side error status.
    #[error("transport error for {resource}: {detail}")]
    Transport { resource: String, detail: String },

    /// Invalid client configuration.
    #[error("invalid client configuration: {detail}")]
    Config { detail: String },

    /// TOML parsing error in a configuration file.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The execution context ended first.
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl ProxyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::NotFound { .. } => ErrorKind::NotFound,
            ProxyError::InvalidPath(_)
            | ProxyError::InvalidVersion(_)
            | ProxyError::InvalidArgument { .. }
            | ProxyError::Config { .. }
            | ProxyError::Toml(_) => ErrorKind::InvalidArgument,
            ProxyError::ProtocolViolation { .. } => ErrorKind::ProtocolViolation,
            ProxyError::Transport { .. } => ErrorKind::Transport,
            ProxyError::Interrupted(Interrupted::Canceled) => ErrorKind::Canceled,
            ProxyError::Interrupted(Interrupted::DeadlineExceeded) => ErrorKind::DeadlineExceeded,
        }
    }

    /// Report whether the error means "does not exist".
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub(crate) fn protocol(resource: &str, detail: impl Into<String>) -> Self {
        ProxyError::ProtocolViolation {
            resource: resource.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn transport(resource: &str, detail: impl Into<String>) -> Self {
        ProxyError::Transport {
            resource: resource.to_string(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for proxy operations.
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let err = ProxyError::NotFound {
            resource: "foo.com/bar/@v/list".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "not found: foo.com/bar/@v/list");

        assert_eq!(
            ProxyError::protocol("x", "bad").kind(),
            ErrorKind::ProtocolViolation
        );
        assert_eq!(ProxyError::transport("x", "reset").kind(), ErrorKind::Transport);
        assert_eq!(
            ProxyError::from(Interrupted::Canceled).kind(),
            ErrorKind::Canceled
        );
        assert_eq!(
            ProxyError::from(Interrupted::DeadlineExceeded).kind(),
            ErrorKind::DeadlineExceeded
        );
        assert!(!ProxyError::from(Interrupted::Canceled).is_not_found());
    }
}
