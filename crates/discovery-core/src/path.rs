//! Path helpers over the module namespace.
//!
//! Paths are `/`-separated and compared case-sensitively. A prefix only
//! counts when it ends at a `/` boundary: `x/tools/go` contains
//! `x/tools/go/packages` but not `x/tools/goop`.

use crate::error::InvalidPath;

/// Report whether `path` equals `dir` or lies below it.
pub fn is_within(path: &str, dir: &str) -> bool {
    match path.strip_prefix(dir) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Report whether a module at `module_path` could own the directory `dir`.
pub fn module_owns(module_path: &str, dir: &str) -> bool {
    is_within(dir, module_path)
}

/// Validate a module path before it is sent to a registry.
pub fn check_module_path(path: &str) -> Result<(), InvalidPath> {
    check_elements(path)?;
    if let Some(c) = path
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '/')))
    {
        return Err(InvalidPath::new(path, format!("invalid character {c:?}")));
    }
    Ok(())
}

/// Validate a directory path used as a query anchor.
pub fn check_dir_path(path: &str) -> Result<(), InvalidPath> {
    check_elements(path)
}

fn check_elements(path: &str) -> Result<(), InvalidPath> {
    if path.is_empty() {
        return Err(InvalidPath::new(path, "empty path"));
    }
    if path.starts_with('/') || path.ends_with('/') {
        return Err(InvalidPath::new(path, "leading or trailing slash"));
    }
    for elem in path.split('/') {
        match elem {
            "" => return Err(InvalidPath::new(path, "empty path element")),
            "." | ".." => return Err(InvalidPath::new(path, format!("invalid element {elem:?}"))),
            _ => {}
        }
    }
    Ok(())
}

/// Strip a trailing `/vN` major-version suffix (N >= 2) from a module path.
pub fn series_path(module_path: &str) -> &str {
    match module_path.rsplit_once('/') {
        Some((prefix, last)) if is_major_suffix(last) => prefix,
        _ => module_path,
    }
}

fn is_major_suffix(elem: &str) -> bool {
    let Some(digits) = elem.strip_prefix('v') else {
        return false;
    };
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !digits.starts_with('0')
        && digits != "1"
}

/// The path a package would have in the module's v1 series.
///
/// `github.com/a/b/v3/pkg` in module `github.com/a/b/v3` has v1 path
/// `github.com/a/b/pkg`.
pub fn v1_path(path: &str, module_path: &str) -> String {
    match path.strip_prefix(module_path) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{rest}", series_path(module_path))
        }
        _ => path.to_string(),
    }
}
