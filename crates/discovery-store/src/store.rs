//! Metadata store interface and in-memory implementation.

use std::path::Path;
use std::sync::Arc;

use discovery_core::{is_within, module_owns};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::row::{PackageRow, VersionRow};

/// Read-only access to stored module versions and packages.
///
/// Implementations must be safe for concurrent use; the resolver issues
/// read queries only.
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    /// Every stored version of every module that could own `dir_path`,
    /// i.e. whose path is `dir_path` or a `/`-bounded prefix of it.
    async fn module_versions(&self, dir_path: &str) -> Result<Vec<VersionRow>>;

    /// Packages of `module_path` at `version` whose path is `dir_path`
    /// or lies below it.
    async fn packages(
        &self,
        dir_path: &str,
        module_path: &str,
        version: &str,
    ) -> Result<Vec<PackageRow>>;
}

#[async_trait::async_trait]
impl<S: MetadataStore + ?Sized> MetadataStore for Arc<S> {
    async fn module_versions(&self, dir_path: &str) -> Result<Vec<VersionRow>> {
        (**self).module_versions(dir_path).await
    }

    async fn packages(
        &self,
        dir_path: &str,
        module_path: &str,
        version: &str,
    ) -> Result<Vec<PackageRow>> {
        (**self).packages(dir_path, module_path, version).await
    }
}

/// A store held entirely in memory.
///
/// Built up front and immutable afterwards. Snapshots are JSON objects
/// with `versions` and `packages` arrays of rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    versions: Vec<VersionRow>,
    #[serde(default)]
    packages: Vec<PackageRow>,
}

impl MemoryStore {
    pub fn new(versions: Vec<VersionRow>, packages: Vec<PackageRow>) -> Self {
        MemoryStore { versions, packages }
    }

    pub fn with_version(mut self, row: VersionRow) -> Self {
        self.versions.push(row);
        self
    }

    pub fn with_package(mut self, row: PackageRow) -> Self {
        self.packages.push(row);
        self
    }

    /// Parse a JSON snapshot.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        MemoryStore::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}

#[async_trait::async_trait]
impl MetadataStore for MemoryStore {
    async fn module_versions(&self, dir_path: &str) -> Result<Vec<VersionRow>> {
        Ok(self
            .versions
            .iter()
            .filter(|v| module_owns(&v.module_path, dir_path))
            .cloned()
            .collect())
    }

    async fn packages(
        &self,
        dir_path: &str,
        module_path: &str,
        version: &str,
    ) -> Result<Vec<PackageRow>> {
        Ok(self
            .packages
            .iter()
            .filter(|p| {
                p.module_path == module_path && p.version == version && is_within(&p.path, dir_path)
            })
            .cloned()
            .collect())
    }
}
