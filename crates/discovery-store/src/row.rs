//! Raw rows returned by a metadata store.
//!
//! A [`VersionRow`] describes one module version, including the numeric
//! columns used for ranking. A [`PackageRow`] describes one package of one
//! module version. The resolver joins the two into a [`Package`].

use chrono::{DateTime, Utc};
use discovery_core::{
    parse_version, v1_path, LicenseMetadata, Package, RankKey, Readme, SourceInfo, VersionType,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// One stored module version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRow {
    pub module_path: String,
    pub version: String,
    pub commit_time: DateTime<Utc>,
    pub version_type: VersionType,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Prerelease component; `None` for releases.
    #[serde(default)]
    pub prerelease: Option<String>,
    #[serde(default)]
    pub readme_file_path: Option<String>,
    #[serde(default)]
    pub readme_contents: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub vcs_type: Option<String>,
    #[serde(default)]
    pub homepage_url: Option<String>,
}

impl VersionRow {
    /// Build a row, deriving the ranking columns from `version`.
    pub fn new(module_path: &str, version: &str, commit_time: DateTime<Utc>) -> Result<Self> {
        let parsed = parse_version(version)?;
        let key = RankKey::from_version(&parsed);
        Ok(VersionRow {
            module_path: module_path.to_string(),
            version: version.to_string(),
            commit_time,
            version_type: VersionType::of(&parsed),
            major: key.major,
            minor: key.minor,
            patch: key.patch,
            prerelease: key.prerelease,
            readme_file_path: None,
            readme_contents: None,
            repository_url: None,
            vcs_type: None,
            homepage_url: None,
        })
    }

    pub fn with_readme(mut self, file_path: &str, contents: &str) -> Self {
        self.readme_file_path = Some(file_path.to_string());
        self.readme_contents = Some(contents.to_string());
        self
    }

    pub fn with_source(mut self, repository_url: &str, vcs_type: &str, homepage_url: Option<&str>) -> Self {
        self.repository_url = Some(repository_url.to_string());
        self.vcs_type = Some(vcs_type.to_string());
        self.homepage_url = homepage_url.map(str::to_string);
        self
    }

    pub fn rank_key(&self) -> RankKey {
        RankKey::new(self.major, self.minor, self.patch, self.prerelease.clone())
    }

    pub fn readme(&self) -> Option<Readme> {
        match (&self.readme_file_path, &self.readme_contents) {
            (Some(file_path), Some(contents)) => Some(Readme {
                file_path: file_path.clone(),
                contents: contents.clone(),
            }),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<SourceInfo> {
        Some(SourceInfo {
            repository_url: self.repository_url.clone()?,
            vcs_type: self.vcs_type.clone().unwrap_or_default(),
            homepage_url: self.homepage_url.clone(),
        })
    }
}

fn default_redistributable() -> bool {
    true
}

/// One stored package of a module version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRow {
    pub path: String,
    pub module_path: String,
    pub version: String,
    /// Empty for a directory that is not a package.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub synopsis: String,
    pub v1_path: String,
    #[serde(default)]
    pub documentation_html: String,
    #[serde(default)]
    pub license_types: Vec<String>,
    #[serde(default)]
    pub license_paths: Vec<String>,
    #[serde(default = "default_redistributable")]
    pub is_redistributable: bool,
}

impl PackageRow {
    pub fn new(path: &str, module_path: &str, version: &str, name: &str) -> Self {
        PackageRow {
            path: path.to_string(),
            module_path: module_path.to_string(),
            version: version.to_string(),
            name: name.to_string(),
            synopsis: String::new(),
            v1_path: v1_path(path, module_path),
            documentation_html: String::new(),
            license_types: Vec::new(),
            license_paths: Vec::new(),
            is_redistributable: true,
        }
    }

    pub fn with_synopsis(mut self, synopsis: &str) -> Self {
        self.synopsis = synopsis.to_string();
        self
    }

    pub fn with_documentation(mut self, html: &str) -> Self {
        self.documentation_html = html.to_string();
        self
    }

    pub fn with_license(mut self, license_type: &str, file_path: &str) -> Self {
        self.license_types.push(license_type.to_string());
        self.license_paths.push(file_path.to_string());
        self
    }

    pub fn non_redistributable(mut self) -> Self {
        self.is_redistributable = false;
        self
    }

    /// Join with the row of the owning module version.
    pub fn into_package(self, version: &VersionRow) -> Result<Package> {
        if self.module_path != version.module_path || self.version != version.version {
            return Err(StoreError::Internal {
                detail: format!(
                    "package {} at {}@{} joined with {}@{}",
                    self.path, self.module_path, self.version, version.module_path, version.version
                ),
            });
        }
        let licenses = zip_license_metadata(&self.license_types, &self.license_paths)?;
        Ok(Package {
            path: self.path,
            name: self.name,
            synopsis: self.synopsis,
            v1_path: self.v1_path,
            documentation_html: self.documentation_html,
            is_redistributable: self.is_redistributable,
            licenses,
            module_path: self.module_path,
            version: self.version,
            version_type: version.version_type,
            commit_time: version.commit_time,
        })
    }
}

/// Pair license types with license file paths.
///
/// Stores keep the two as parallel columns; they must have equal length.
pub fn zip_license_metadata(types: &[String], paths: &[String]) -> Result<Vec<LicenseMetadata>> {
    if types.len() != paths.len() {
        return Err(StoreError::Internal {
            detail: format!(
                "license types and paths differ in length: {} != {}",
                types.len(),
                paths.len()
            ),
        });
    }
    Ok(types
        .iter()
        .zip(paths)
        .map(|(t, p)| LicenseMetadata {
            types: vec![t.clone()],
            file_path: p.clone(),
        })
        .collect())
}
