//! Resolved module, package and directory values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::version::VersionType;

/// Identity of one resolved module version, as reported by a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub module_path: String,
    /// Never empty.
    pub version: String,
    /// Commit time of the version.
    pub time: DateTime<Utc>,
}

/// License metadata attached to a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseMetadata {
    /// License identifiers (e.g. "MIT").
    pub types: Vec<String>,
    /// Path of the license file relative to the module root.
    pub file_path: String,
}

/// A README at the given path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readme {
    pub file_path: String,
    pub contents: String,
}

/// Where a module's source is hosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub repository_url: String,
    pub vcs_type: String,
    #[serde(default)]
    pub homepage_url: Option<String>,
}

/// One package of a module at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Import path.
    pub path: String,
    /// Declared package name; empty for a plain directory.
    pub name: String,
    pub synopsis: String,
    /// Import path with any major-version suffix removed from the module part.
    pub v1_path: String,
    /// Rendered documentation body.
    pub documentation_html: String,
    pub is_redistributable: bool,
    pub licenses: Vec<LicenseMetadata>,

    // Owning module version.
    pub module_path: String,
    pub version: String,
    pub version_type: VersionType,
    pub commit_time: DateTime<Utc>,
}

impl Package {
    /// Report whether the path is a package rather than a plain directory.
    pub fn is_package(&self) -> bool {
        !self.name.is_empty()
    }

    /// Report whether the path is also the root of its module.
    pub fn is_module(&self) -> bool {
        self.path == self.module_path
    }
}

/// The packages found under a directory path, at one module version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    /// The queried path.
    pub path: String,
    pub module_path: String,
    pub version: String,
    pub commit_time: DateTime<Utc>,
    #[serde(default)]
    pub readme: Option<Readme>,
    #[serde(default)]
    pub source: Option<SourceInfo>,
    /// Sorted by path, without duplicates.
    pub packages: Vec<Package>,
}

impl Directory {
    /// Look up a package by import path.
    pub fn package(&self, path: &str) -> Option<&Package> {
        self.packages
            .binary_search_by(|p| p.path.as_str().cmp(path))
            .ok()
            .map(|i| &self.packages[i])
    }

    /// Import paths of all packages, in order.
    pub fn package_paths(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(|p| p.path.as_str())
    }
}
