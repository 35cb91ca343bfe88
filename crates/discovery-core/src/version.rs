//! Module versions: parsing, classification and "latest" ranking.
//!
//! Module versions are semantic versions with a mandatory `v` prefix
//! (`v1.2.3`, `v2.0.0+incompatible`, `v0.0.0-20190101000000-abcdef123456`).
//! Ranking follows one rule: every release outranks every prerelease, and
//! within a class the numerically highest version wins.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::InvalidVersion;

/// The reserved version selector meaning "the canonical current release".
pub const LATEST: &str = "latest";

/// A parsed semantic version (without the `v` prefix).
pub type Version = semver::Version;

/// Classification of a module version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    /// A tagged release with no prerelease component.
    Release,
    /// A tagged prerelease (`v1.0.0-rc.1`).
    Prerelease,
    /// A pseudo-version naming an untagged commit.
    Pseudo,
}

impl VersionType {
    /// Classify a parsed version.
    pub fn of(version: &Version) -> Self {
        if version.pre.is_empty() {
            VersionType::Release
        } else if is_pseudo(version) {
            VersionType::Pseudo
        } else {
            VersionType::Prerelease
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionType::Release => "release",
            VersionType::Prerelease => "prerelease",
            VersionType::Pseudo => "pseudo",
        }
    }
}

/// Parse a module version string like "v1.2.3".
pub fn parse_version(s: &str) -> Result<Version, InvalidVersion> {
    let rest = s
        .strip_prefix('v')
        .ok_or_else(|| InvalidVersion::new(s, "missing leading 'v'"))?;
    Version::parse(rest).map_err(|e| InvalidVersion::new(s, e.to_string()))
}

/// Check a version selector: either [`LATEST`] or a parseable module version.
pub fn check_version(s: &str) -> Result<(), InvalidVersion> {
    if s == LATEST {
        return Ok(());
    }
    parse_version(s).map(|_| ())
}

/// Report whether the version is a pseudo-version.
///
/// Accepted shapes of the prerelease component:
/// `yyyymmddhhmmss-abcdefabcdef` on a `vX.0.0` base, and
/// `<pre>.0.yyyymmddhhmmss-abcdefabcdef` or `0.yyyymmddhhmmss-abcdefabcdef`
/// on any base.
pub fn is_pseudo(version: &Version) -> bool {
    let Some((head, revision)) = version.pre.as_str().rsplit_once('-') else {
        return false;
    };
    let (base, timestamp) = match head.rsplit_once('.') {
        Some((base, timestamp)) => (Some(base), timestamp),
        None => (None, head),
    };
    let base_ok = match base {
        None => version.minor == 0 && version.patch == 0,
        Some(base) => base == "0" || base.ends_with(".0"),
    };
    base_ok
        && revision.len() == 12
        && revision
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        && timestamp.len() == 14
        && timestamp.bytes().all(|b| b.is_ascii_digit())
}

/// Ranking key used to pick one canonical version per module.
///
/// Ordered so that the *greater* key is the *better* version: releases
/// beat prereleases regardless of numbers, then major, minor and patch,
/// then the prerelease string compared lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankKey {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// `None` for a release.
    pub prerelease: Option<String>,
}

impl RankKey {
    pub fn new(major: u64, minor: u64, patch: u64, prerelease: Option<String>) -> Self {
        RankKey {
            major,
            minor,
            patch,
            prerelease: prerelease.filter(|p| !p.is_empty()),
        }
    }

    pub fn from_version(version: &Version) -> Self {
        let pre = version.pre.as_str();
        RankKey::new(
            version.major,
            version.minor,
            version.patch,
            (!pre.is_empty()).then(|| pre.to_string()),
        )
    }

    pub fn is_release(&self) -> bool {
        self.prerelease.is_none()
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.is_release()
            .cmp(&other.is_release())
            .then(self.major.cmp(&other.major))
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| self.prerelease.cmp(&other.prerelease))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pick the best-ranked version out of a list of version strings.
///
/// Strings that do not parse as module versions are ignored.
pub fn latest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .filter_map(|v| parse_version(v).ok().map(|p| (RankKey::from_version(&p), v)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, v)| v)
}
