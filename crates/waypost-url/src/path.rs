//! Path resolution and comparison.
//!
//! Paths handled here are plain `/`-separated strings. Resolution follows the
//! usual "directory of the base" rule: the trailing segment of a base path that
//! does not end in a separator is treated as a file name and dropped before the
//! target segments are folded in.

use std::borrow::Cow;

/// Path segment separator.
pub const SEPARATOR: char = '/';

/// Root path.
pub const ROOT: &str = "/";

/// Resolves `target` against `base`.
///
/// - An absolute `target` (leading `/`) ignores `base` entirely.
/// - `..` removes the last accumulated segment (no-op at the root).
/// - `.` and empty segments are skipped.
/// - A trailing separator on `target` is kept on the result.
///
/// The result always starts with exactly one `/` and never contains `//`.
///
/// # Examples
///
/// ```
/// use waypost_url::path::resolve;
///
/// assert_eq!(resolve("/a/b/c", "../d"), "/a/d");
/// assert_eq!(resolve("/work/list", "./../index"), "/index");
/// assert_eq!(resolve("/a/b/", "c"), "/a/b/c");
/// assert_eq!(resolve("/a", "/x/y/"), "/x/y/");
/// ```
pub fn resolve(base: &str, target: &str) -> String {
	let mut segments: Vec<&str> = Vec::new();

	if !is_absolute(target) {
		segments.extend(base.split(SEPARATOR).filter(|s| !s.is_empty()));
		if !base.ends_with(SEPARATOR) {
			segments.pop();
		}
	}

	for segment in target.split(SEPARATOR) {
		match segment {
			".." => {
				segments.pop();
			}
			"" | "." => {}
			other => segments.push(other),
		}
	}

	let mut resolved = String::with_capacity(base.len() + target.len() + 1);
	resolved.push(SEPARATOR);
	resolved.push_str(&segments.join(ROOT));
	if !segments.is_empty() && target.ends_with(SEPARATOR) {
		resolved.push(SEPARATOR);
	}
	resolved
}

/// Returns whether `path` is absolute.
pub fn is_absolute(path: &str) -> bool {
	path.starts_with(SEPARATOR)
}

/// Appends `index` to a directory-like path for comparison purposes.
///
/// Paths that do not end in a separator, or an empty `index`, are returned
/// unchanged without allocating.
pub fn with_index<'a>(path: &'a str, index: &str) -> Cow<'a, str> {
	if index.is_empty() || !path.ends_with(SEPARATOR) {
		Cow::Borrowed(path)
	} else {
		Cow::Owned(format!("{}{}", path, index))
	}
}

/// Compares two paths after index normalization.
pub fn equal(a: &str, b: &str, index: &str) -> bool {
	with_index(a, index) == with_index(b, index)
}
