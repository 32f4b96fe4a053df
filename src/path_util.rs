//! Turns user-supplied paths and URIs into the normalized string keys that
//! folder containment queries operate on.
//!
//! Everything that compares keys goes through [`key_segments`] so the folder
//! index, duplicate detection, and relativization can never disagree about
//! segment boundaries or case folding.

use std::path::Path;

use percent_encoding::percent_decode_str;
use url::Url;

/// Whether folder identifiers compare case-insensitively on this platform.
pub const IGNORE_CASE: bool = cfg!(any(windows, target_os = "macos"));

/// Parses caller input into a URI key. Accepts either a full URI or an
/// absolute filesystem path; anything else (including relative paths) yields
/// `None` so read operations can echo the input back unchanged.
pub fn parse_key(input: &str) -> Option<Url> {
    if input.contains("://") {
        Url::parse(input).ok()
    } else {
        Url::from_file_path(Path::new(input)).ok()
    }
}

/// Canonical comparison form of a key: trailing slash trimmed, case folded
/// when `ignore_case` is set.
pub fn fold_key(key: &str, ignore_case: bool) -> String {
    let trimmed = key.trim_end_matches('/');
    if ignore_case {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}

/// Splits a key into its path segments in canonical comparison form.
pub fn key_segments(key: &str, ignore_case: bool) -> Vec<String> {
    fold_key(key, ignore_case)
        .split('/')
        .map(str::to_string)
        .collect()
}

/// The key with its last path segment removed, or `None` when there is no
/// segment left to strip.
pub fn parent_key(key: &str) -> Option<String> {
    let trimmed = key.trim_end_matches('/');
    let (parent, last) = trimmed.rsplit_once('/')?;
    if last.is_empty() {
        return None;
    }
    Some(parent.to_string())
}

/// Strips `base` off the front of `query` on segment boundaries, returning
/// the remainder joined with `/`. `None` when `base` is not an ancestor of
/// (or equal to) `query`. The remainder keeps the query's original casing
/// even when the comparison itself folded case.
pub fn strip_ancestor(base: &str, query: &str, ignore_case: bool) -> Option<String> {
    let base_segments = key_segments(base, ignore_case);
    let query_segments = key_segments(query, ignore_case);

    if query_segments.len() < base_segments.len() {
        return None;
    }
    if query_segments[..base_segments.len()] != base_segments[..] {
        return None;
    }

    let raw: Vec<&str> = query.trim_end_matches('/').split('/').collect();
    Some(raw[base_segments.len()..].join("/"))
}

/// Last path segment of a key, percent-decoded for display. Falls back to
/// the whole key for segment-less URIs like `untitled:Untitled-1`.
pub fn basename(key: &str) -> String {
    let trimmed = key.trim_end_matches('/');
    let raw = match trimmed.rsplit_once('/') {
        Some((_, last)) if !last.is_empty() => last,
        _ => trimmed,
    };
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_accepts_uris_and_absolute_paths() {
        assert_eq!(
            parse_key("file:///a/b").unwrap().as_str(),
            "file:///a/b"
        );
        assert_eq!(parse_key("/a/b").unwrap().as_str(), "file:///a/b");
        assert_eq!(parse_key("relative/path"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn fold_key_trims_and_folds() {
        assert_eq!(fold_key("file:///a/b/", false), "file:///a/b");
        assert_eq!(fold_key("file:///A/B", true), "file:///a/b");
        assert_eq!(fold_key("file:///A/B", false), "file:///A/B");
    }

    #[test]
    fn parent_key_strips_one_segment() {
        assert_eq!(parent_key("file:///a/b").as_deref(), Some("file:///a"));
        assert_eq!(parent_key("file:///a").as_deref(), Some("file://"));
        assert_eq!(parent_key("untitled:Doc"), None);
    }

    #[test]
    fn strip_ancestor_respects_segment_boundaries() {
        assert_eq!(
            strip_ancestor("file:///a", "file:///a/b/c.txt", false).as_deref(),
            Some("b/c.txt")
        );
        assert_eq!(strip_ancestor("file:///a", "file:///a", false).as_deref(), Some(""));
        // `/foo` is not an ancestor of `/foobar`.
        assert_eq!(strip_ancestor("file:///foo", "file:///foobar/x", false), None);
        assert_eq!(strip_ancestor("file:///a/b", "file:///a", false), None);
    }

    #[test]
    fn strip_ancestor_keeps_query_casing_under_case_folding() {
        assert_eq!(
            strip_ancestor("file:///a", "file:///A/Sub/File.TXT", true).as_deref(),
            Some("Sub/File.TXT")
        );
    }

    #[test]
    fn basename_decodes_percent_escapes() {
        assert_eq!(basename("file:///a/b"), "b");
        assert_eq!(basename("file:///a/my%20dir/"), "my dir");
        assert_eq!(basename("untitled:Doc"), "untitled:Doc");
    }
}
