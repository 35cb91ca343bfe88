//! Case-escaping of module paths and versions for proxy URLs.
//!
//! Proxies may be backed by case-insensitive file systems, so upper-case
//! letters are encoded as `!` followed by the lower-case letter:
//! `github.com/Azure/go` becomes `github.com/!azure/go`.

use discovery_core::version::check_version;
use discovery_core::check_module_path;

use crate::error::Result;

/// Validate and escape a module path.
pub fn escape_path(path: &str) -> Result<String> {
    check_module_path(path)?;
    Ok(escape(path))
}

/// Validate and escape a version (or the `latest` sentinel).
pub fn escape_version(version: &str) -> Result<String> {
    check_version(version)?;
    Ok(escape(version))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            out.push('!');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Reverse the escaping. Returns `None` for strings no escaper produces.
#[cfg(test)]
pub(crate) fn unescape(escaped: &str) -> Option<String> {
    let mut out = String::with_capacity(escaped.len());
    let mut bang = false;
    for c in escaped.chars() {
        if bang {
            if !c.is_ascii_lowercase() {
                return None;
            }
            out.push(c.to_ascii_uppercase());
            bang = false;
        } else if c == '!' {
            bang = true;
        } else if c.is_ascii_uppercase() {
            return None;
        } else {
            out.push(c);
        }
    }
    (!bang).then_some(out)
}

/// Unescape a module path and validate it, for servers decoding requests.
#[cfg(test)]
pub(crate) fn unescape_path(
    escaped: &str,
) -> std::result::Result<String, discovery_core::InvalidPath> {
    let path = unescape(escaped).ok_or_else(|| discovery_core::InvalidPath {
        path: escaped.to_string(),
        detail: "bad escaping".to_string(),
    })?;
    check_module_path(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use discovery_core::ErrorKind;

    #[test]
    fn escapes_upper_case() {
        assert_eq!(
            escape_path("github.com/Azure/azure-sdk-for-go").unwrap(),
            "github.com/!azure/azure-sdk-for-go"
        );
        assert_eq!(escape_path("foo.com/bar").unwrap(), "foo.com/bar");
        assert_eq!(escape_version("v1.0.0-RC").unwrap(), "v1.0.0-!r!c");
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            escape_path("foo.com//bar").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            escape_version("1.0.0").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn unescape_inverts_escape() {
        assert_eq!(
            unescape("github.com/!azure/go").as_deref(),
            Some("github.com/Azure/go")
        );
        assert_eq!(unescape("github.com/Azure/go"), None);
        assert_eq!(unescape("bad!"), None);
        assert_eq!(unescape("bad!1"), None);
    }

    #[test]
    fn unescape_path_validates() {
        assert_eq!(unescape_path("foo.com/!bar").unwrap(), "foo.com/Bar");
        assert!(unescape_path("foo.com/../bar").is_err());
    }
}
