//! Mapping between local paths and object keys
//!
//! Upload keys are built by removing the strip prefix from a local path and
//! joining the rest onto the target prefix. Downloads go the other way by
//! removing the target directory from a key and prepending the strip prefix.
//! The two directions are not exact inverses: the download side prepends the
//! strip prefix as a literal string, so a strip prefix without a trailing
//! slash does not round-trip.

use std::path::Path;

/// Remove a single leading `/` from the configured target
pub fn normalize_target(target: &str) -> &str {
    target.strip_prefix('/').unwrap_or(target)
}

/// Target as a listing prefix: forward slashes, no leading `/`
pub fn normalize_target_dir(target: &str) -> String {
    let slashed = to_slash(target);
    match slashed.strip_prefix('/') {
        Some(rest) => rest.to_string(),
        None => slashed,
    }
}

/// Convert platform separators to `/`
pub fn to_slash(path: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Local path rendered with forward slashes
pub fn path_to_slash(path: &Path) -> String {
    to_slash(&path.to_string_lossy())
}

/// Object key for the local file at `local_path`.
///
/// The result always starts with `/`.
pub fn to_key(target: &str, local_path: &str, strip_prefix: &str) -> String {
    let strip = to_slash(strip_prefix);
    let relative = local_path.strip_prefix(strip.as_str()).unwrap_or(local_path);
    let joined = join_clean(&to_slash(target), &to_slash(relative));

    if joined.starts_with('/') {
        joined
    } else {
        format!("/{joined}")
    }
}

/// Local destination for the object stored at `key`
pub fn to_local_path(target_dir: &str, key: &str, strip_prefix: &str) -> String {
    let rest = key.strip_prefix(target_dir).unwrap_or(key);
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    format!("{strip_prefix}{rest}")
}

/// Join two slash-separated paths and clean the result lexically.
///
/// Empty and `.` segments are dropped and `..` removes the preceding segment.
/// A `..` that would climb above a rooted path is dropped; above a relative
/// path it is kept. A rooted result keeps its leading `/`.
fn join_clean(base: &str, child: &str) -> String {
    let rooted = if base.is_empty() {
        child.starts_with('/')
    } else {
        base.starts_with('/')
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(child.split('/')) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            s => segments.push(s),
        }
    }

    let body = segments.join("/");
    if rooted { format!("/{body}") } else { body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target("/assets"), "assets");
        assert_eq!(normalize_target("assets"), "assets");
        assert_eq!(normalize_target("//assets"), "/assets");
        assert_eq!(normalize_target(""), "");
    }

    #[test]
    fn test_normalize_target_dir() {
        assert_eq!(normalize_target_dir("/cache/build"), "cache/build");
        assert_eq!(normalize_target_dir("cache/"), "cache/");
        assert_eq!(normalize_target_dir(normalize_target("//cache")), "cache");
    }

    #[test]
    fn test_to_key_strips_prefix_and_joins() {
        let target = normalize_target("/assets");
        assert_eq!(to_key(target, "dist/js/app.js", "dist/"), "/assets/js/app.js");
    }

    #[test]
    fn test_to_key_is_deterministic() {
        let first = to_key("assets", "dist/css/site.css", "dist/");
        let second = to_key("assets", "dist/css/site.css", "dist/");
        assert_eq!(first, second);
    }

    #[test]
    fn test_to_key_without_matching_prefix() {
        assert_eq!(to_key("assets", "build/app.js", "dist/"), "/assets/build/app.js");
        assert_eq!(to_key("", "app.js", ""), "/app.js");
        assert_eq!(to_key("", "", ""), "/");
    }

    #[test]
    fn test_to_key_cleans_path() {
        assert_eq!(to_key("assets/", "./dist//app.js", ""), "/assets/dist/app.js");
        assert_eq!(to_key("assets", "dist/../app.js", ""), "/assets/app.js");
        assert_eq!(to_key("a/b", "../../../x", ""), "/../x");
    }

    #[test]
    fn test_to_key_prefix_without_trailing_slash() {
        assert_eq!(to_key("assets", "dist/js/app.js", "dist"), "/assets/js/app.js");
    }

    #[test]
    fn test_to_local_path() {
        assert_eq!(to_local_path("assets", "assets/js/app.js", "dist/"), "dist/js/app.js");
        assert_eq!(to_local_path("assets/", "assets/js/app.js", "dist/"), "dist/js/app.js");
        assert_eq!(to_local_path("", "js/app.js", ""), "js/app.js");
    }

    #[test]
    fn test_round_trip_with_trailing_slash_prefix() {
        let key = to_key("assets", "dist/js/app.js", "dist/");
        // Keys are stored without the leading slash.
        let stored = key.trim_start_matches('/');
        assert_eq!(to_local_path("assets", stored, "dist/"), "dist/js/app.js");
    }

    #[test]
    fn test_round_trip_breaks_without_trailing_slash_prefix() {
        let key = to_key("assets", "dist/js/app.js", "dist");
        let stored = key.trim_start_matches('/');
        assert_eq!(stored, "assets/js/app.js");
        assert_eq!(to_local_path("assets", stored, "dist"), "distjs/app.js");
    }

    #[test]
    fn test_target_dir_matches_sibling_prefix() {
        // Listing "assets" also returns keys under "assets-old/".
        assert_eq!(to_local_path("assets", "assets-old/a.txt", "out/"), "out/-old/a.txt");
    }

    #[test]
    fn test_to_local_path_key_outside_target() {
        assert_eq!(to_local_path("assets", "other/a.txt", "out/"), "out/other/a.txt");
    }
}
