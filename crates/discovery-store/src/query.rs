//! The directory query: one parameter object, two selection algorithms.
//!
//! A [`DirectoryQuery`] carries the directory path and a
//! [`VersionSelector`]. It owns the matching predicates so that stores and
//! the resolver agree on exactly one definition of "under this directory"
//! and "could own this directory".

use std::collections::BTreeMap;
use std::fmt;

use discovery_core::{check_dir_path, is_within, module_owns, parse_version, LATEST};

use crate::error::{Result, StoreError};
use crate::row::VersionRow;

/// Which version of each candidate module to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// The best-ranked stored version of each module.
    Latest,
    /// Exactly this version.
    Exact(String),
}

impl VersionSelector {
    /// Parse `latest` or a concrete module version.
    pub fn parse(version: &str) -> Result<Self> {
        if version.is_empty() {
            return Err(StoreError::InvalidArgument {
                detail: "empty version; use \"latest\"".to_string(),
            });
        }
        if version == LATEST {
            return Ok(VersionSelector::Latest);
        }
        parse_version(version)?;
        Ok(VersionSelector::Exact(version.to_string()))
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str(LATEST),
            VersionSelector::Exact(v) => f.write_str(v),
        }
    }
}

/// A validated directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQuery {
    dir_path: String,
    selector: VersionSelector,
}

impl DirectoryQuery {
    pub fn new(dir_path: &str, version: &str) -> Result<Self> {
        check_dir_path(dir_path)?;
        Ok(DirectoryQuery {
            dir_path: dir_path.to_string(),
            selector: VersionSelector::parse(version)?,
        })
    }

    pub fn dir_path(&self) -> &str {
        &self.dir_path
    }

    pub fn selector(&self) -> &VersionSelector {
        &self.selector
    }

    /// A package path is the directory itself or lies below it.
    pub fn contains_package(&self, package_path: &str) -> bool {
        is_within(package_path, &self.dir_path)
    }

    /// The directory is the module root or lies below it.
    pub fn may_be_owned_by(&self, module_path: &str) -> bool {
        module_owns(module_path, &self.dir_path)
    }

    /// Reduce candidate module versions to at most one per module.
    ///
    /// Rows for modules that cannot own the directory are dropped. The
    /// result is ordered by module path.
    pub fn select_versions(&self, candidates: Vec<VersionRow>) -> Vec<VersionRow> {
        let mut best: BTreeMap<String, VersionRow> = BTreeMap::new();
        for row in candidates {
            if !self.may_be_owned_by(&row.module_path) {
                continue;
            }
            match &self.selector {
                VersionSelector::Exact(version) => {
                    if &row.version == version {
                        best.entry(row.module_path.clone()).or_insert(row);
                    }
                }
                VersionSelector::Latest => match best.get(&row.module_path) {
                    Some(current) if current.rank_key() >= row.rank_key() => {}
                    _ => {
                        best.insert(row.module_path.clone(), row);
                    }
                },
            }
        }
        best.into_values().collect()
    }
}
