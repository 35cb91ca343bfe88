//! Directory resolution for module discovery.
//!
//! Given a directory path and a version selector, [`DirectoryResolver`]
//! finds the module that owns the directory, the version to use and every
//! package stored at or below the directory.
//!
//! A package `P` of module `M` belongs to the result for directory `D` when
//! `P` is `D` or lies below `D`, `D` is `M` or lies below `M`, and the
//! package's version is the one selected for `M`. When several modules
//! qualify, the longest module path wins.
//!
//! The store is read through the [`MetadataStore`] trait; [`MemoryStore`]
//! is an in-memory implementation that can also be loaded from a JSON
//! snapshot.

pub mod directory;
pub mod error;
pub mod query;
pub mod row;
pub mod store;

// Re-exports for convenience.
pub use directory::DirectoryResolver;
pub use error::{Result, StoreError};
pub use query::{DirectoryQuery, VersionSelector};
pub use row::{zip_license_metadata, PackageRow, VersionRow};
pub use store::{MemoryStore, MetadataStore};
