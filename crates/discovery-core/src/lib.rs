//! Core types for module discovery.
//!
//! Both the proxy client and the directory resolver speak in terms of the
//! types defined here:
//! - **Model**: `VersionInfo`, `Package`, `Directory` and their metadata
//! - **Versions**: module version parsing, classification and ranking
//! - **Paths**: `/`-boundary prefix matching over the module namespace
//! - **Context**: cancellation and deadlines for every outbound call
//! - **Errors**: the error kind taxonomy shared by all components

pub mod context;
pub mod error;
pub mod model;
pub mod path;
pub mod version;

// Re-exports for convenience.
pub use context::{Context, Interrupted};
pub use error::{ErrorKind, InvalidPath, InvalidVersion};
pub use model::{Directory, LicenseMetadata, Package, Readme, SourceInfo, VersionInfo};
pub use path::{check_dir_path, check_module_path, is_within, module_owns, series_path, v1_path};
pub use version::{check_version, latest, parse_version, RankKey, VersionType, LATEST};
