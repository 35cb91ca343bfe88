//! Client for the module proxy protocol.
//!
//! A module proxy serves four endpoints per module, keyed by the
//! case-escaped module path:
//! - `<module>/@latest`: info for the canonical latest version
//! - `<module>/@v/<version>.info`: info for one version
//! - `<module>/@v/list`: newline-separated list of known versions
//! - `<module>/@v/<version>.zip`: the full module archive
//!
//! [`Client`] turns those into typed results. Absence (404 or 410) is
//! always [`ProxyError::NotFound`]; every other failure keeps its own kind.
//! The network sits behind the [`Transport`] trait so the client can be
//! driven by an in-memory proxy in tests.

pub mod archive;
pub mod client;
pub mod config;
pub mod error;
pub mod escape;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience.
pub use archive::{ArchiveEntry, ContentHash, RawArchive};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ProxyError, Result};
pub use escape::{escape_path, escape_version};
pub use transport::{HttpTransport, Response, Transport};
