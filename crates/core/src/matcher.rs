//! Source file matching
//!
//! Expands the include glob and drops every path that any exclude glob
//! also expands to. Exclusion is exact path membership, not prefix matching.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Check that `pattern` is a syntactically valid glob
pub fn validate_pattern(pattern: &str) -> Result<()> {
    glob::Pattern::new(pattern)
        .map(|_| ())
        .map_err(|e| Error::Glob(format!("invalid pattern '{pattern}': {e}")))
}

/// Make a trailing `**` match everything below it
///
/// `glob` only yields directories for a trailing `**`, so `dist/**` becomes
/// `dist/**/*`.
fn recursive_pattern(pattern: &str) -> Cow<'_, str> {
    if pattern == "**" || pattern.ends_with("/**") {
        Cow::Owned(format!("{pattern}/*"))
    } else {
        Cow::Borrowed(pattern)
    }
}

/// Expand a single glob pattern in filesystem order
pub fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(&recursive_pattern(pattern))
        .map_err(|e| Error::Glob(format!("invalid pattern '{pattern}': {e}")))?;

    paths
        .map(|entry| {
            entry.map_err(|e| {
                Error::Glob(format!("cannot read {}: {}", e.path().display(), e.error()))
            })
        })
        .collect()
}

/// Paths matched by `include` and by none of `excludes`.
///
/// With no excludes the include expansion is returned as is.
pub fn find_matches(include: &str, excludes: &[String]) -> Result<Vec<PathBuf>> {
    let matches = expand(include)?;
    if excludes.is_empty() {
        return Ok(matches);
    }

    let mut excluded: HashSet<PathBuf> = HashSet::new();
    for pattern in excludes {
        excluded.extend(expand(pattern)?);
    }

    Ok(matches
        .into_iter()
        .filter(|path| !excluded.contains(path))
        .collect())
}
