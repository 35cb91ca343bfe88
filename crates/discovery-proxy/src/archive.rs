//! Module zip archives.
//!
//! A module zip holds every file of one module version, each stored under
//! `<module>@<version>/`. The archive is read fully into memory and never
//! modified afterwards.

use std::io::{Cursor, Read};

use sha2::{Digest, Sha256};

use crate::error::{ProxyError, Result};

/// SHA-256 hex digest of fetched bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn compute(data: &[u8]) -> Self {
        ContentHash(hex_encode(&Sha256::digest(data)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a digest written as `sha256:<hex>` or bare hex.
    pub fn matches(&self, expected: &str) -> bool {
        let hex = expected.strip_prefix("sha256:").unwrap_or(expected);
        hex.eq_ignore_ascii_case(&self.0)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.0)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// One file in a module archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full path including the `<module>@<version>/` prefix.
    pub path: String,
    pub contents: Vec<u8>,
}

/// The complete file tree of one module version.
#[derive(Debug, Clone)]
pub struct RawArchive {
    module_path: String,
    version: String,
    prefix: String,
    entries: Vec<ArchiveEntry>,
    hash: ContentHash,
}

impl RawArchive {
    /// Read a module zip, checking every entry against the module prefix.
    pub fn from_zip(module_path: &str, version: &str, data: &[u8]) -> Result<Self> {
        let prefix = format!("{module_path}@{version}/");
        let resource = format!("{module_path}@{version}.zip");
        let violation = |detail: String| ProxyError::protocol(&resource, detail);

        let mut zip = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| violation(format!("reading zip: {e}")))?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip
                .by_index(i)
                .map_err(|e| violation(format!("reading entry {i}: {e}")))?;
            let path = file.name().to_string();
            if !path.starts_with(&prefix) {
                return Err(violation(format!(
                    "entry {path:?} is not under {prefix:?}"
                )));
            }
            if file.is_dir() {
                continue;
            }
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .map_err(|e| violation(format!("reading {path:?}: {e}")))?;
            entries.push(ArchiveEntry { path, contents });
        }

        Ok(RawArchive {
            module_path: module_path.to_string(),
            version: version.to_string(),
            prefix,
            entries,
            hash: ContentHash::compute(data),
        })
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Hash of the zip bytes as fetched.
    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full entry paths, in archive order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    /// Look up an entry by its full path.
    pub fn get(&self, path: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Look up an entry by its path relative to the module root (e.g. `go.mod`).
    pub fn file(&self, relative: &str) -> Option<&ArchiveEntry> {
        self.entries
            .iter()
            .find(|e| self.relative_path(e) == relative)
    }

    /// An entry's path relative to the module root.
    pub fn relative_path<'a>(&self, entry: &'a ArchiveEntry) -> &'a str {
        entry
            .path
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(entry.path.as_str())
    }
}
