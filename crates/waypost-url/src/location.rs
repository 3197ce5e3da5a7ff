//! The [`Location`] value and its parser.

use crate::path;
use crate::query::{Query, QueryMap};
use std::fmt;

/// Default separator between the path and the query string.
pub const DEFAULT_TOKEN: &str = "?";

/// Fragment separator.
const FRAGMENT_SEPARATOR: char = '#';

/// Options for [`Location::parse`].
///
/// ```
/// use waypost_url::{Location, ParseOptions, Query};
///
/// let base = Location::parse("/hospital/search?kw=xxx", &ParseOptions::new());
/// let options = ParseOptions::new().base(&base);
/// let url = Location::parse("../?kw=xxx", &options);
///
/// assert_eq!(url.path(), "/");
/// assert!(url.query().equal(&Query::parse("kw=xxx")));
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions<'a> {
	base: Option<&'a Location>,
	query: Option<&'a Query>,
	token: String,
	index: String,
	default_path: String,
}

impl Default for ParseOptions<'_> {
	fn default() -> Self {
		Self {
			base: None,
			query: None,
			token: DEFAULT_TOKEN.to_string(),
			index: String::new(),
			default_path: path::ROOT.to_string(),
		}
	}
}

impl<'a> ParseOptions<'a> {
	/// Creates options with the `?` token, no base and `/` as default path.
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolves relative paths against `base`.
	pub fn base(mut self, base: &'a Location) -> Self {
		self.base = Some(base);
		self
	}

	/// Like [`ParseOptions::base`], skipping `None`.
	pub fn maybe_base(mut self, base: Option<&'a Location>) -> Self {
		self.base = base;
		self
	}

	/// Adds `query` on top of the parsed query string.
	pub fn query(mut self, query: &'a Query) -> Self {
		self.query = Some(query);
		self
	}

	/// Like [`ParseOptions::query`], skipping `None`.
	pub fn maybe_query(mut self, query: Option<&'a Query>) -> Self {
		self.query = query;
		self
	}

	/// Sets the path/query separator. An empty token keeps the default.
	pub fn token(mut self, token: impl Into<String>) -> Self {
		let token = token.into();
		if !token.is_empty() {
			self.token = token;
		}
		self
	}

	/// Sets the index file name used when comparing directory paths.
	pub fn index(mut self, index: impl Into<String>) -> Self {
		self.index = index.into();
		self
	}

	/// Sets the path used for an empty location without a base.
	pub fn default_path(mut self, default_path: impl Into<String>) -> Self {
		self.default_path = default_path.into();
		self
	}
}

/// A parsed navigable location: path, query and fragment.
///
/// The path is always absolute. A `Location` is built once and then treated as
/// a value; controllers replace their current location wholesale on every
/// accepted navigation.
#[derive(Debug, Clone)]
pub struct Location {
	path: String,
	query: Query,
	fragment: String,
	is_relative: bool,
	token: String,
	index: String,
}

impl Location {
	/// Parses `raw` according to `options`.
	///
	/// The input is split on `#` into a fragment and on the token into path and
	/// query parts. The path part is resolved against the base path (or `/`).
	/// An empty path part keeps the base path, so `?k=v` only replaces the
	/// query; with no base it falls back to the default path.
	pub fn parse(raw: &str, options: &ParseOptions<'_>) -> Self {
		let raw = raw.trim();
		let (rest, fragment) = raw.split_once(FRAGMENT_SEPARATOR).unwrap_or((raw, ""));
		let (path_part, query_part) = rest
			.split_once(options.token.as_str())
			.unwrap_or((rest, ""));
		let path_part = path_part.trim();

		let base_path = options.base.map_or(path::ROOT, |base| base.path.as_str());
		let path = match (path_part.is_empty(), options.base) {
			(false, _) => path::resolve(base_path, path_part),
			(true, Some(base)) => base.path.clone(),
			(true, None) => path::resolve(path::ROOT, &options.default_path),
		};

		let mut query = Query::parse(query_part.trim());
		if let Some(extra) = options.query {
			query.merge(extra);
		}

		Self {
			path,
			query,
			fragment: fragment.to_string(),
			is_relative: !path::is_absolute(path_part),
			token: options.token.clone(),
			index: options.index.clone(),
		}
	}

	/// Returns the absolute path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the query.
	pub fn query(&self) -> &Query {
		&self.query
	}

	/// Returns the decoded query as a handler-facing map.
	pub fn query_map(&self) -> QueryMap {
		self.query.to_map()
	}

	/// Returns the fragment, without `#`.
	pub fn fragment(&self) -> &str {
		&self.fragment
	}

	/// Whether the raw input path was relative.
	pub fn is_relative(&self) -> bool {
		self.is_relative
	}

	/// Returns the path/query separator this location serializes with.
	pub fn token(&self) -> &str {
		&self.token
	}

	/// Returns the index file name used for comparisons.
	pub fn index(&self) -> &str {
		&self.index
	}

	/// Adds a query value. Only meant for locations that are still being built.
	pub fn add_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.query.add(key, value);
	}

	/// Adds every value of `query`. Only meant for locations that are still
	/// being built.
	pub fn add_query_map(&mut self, query: &Query) {
		self.query.merge(query);
	}

	/// Serializes with an explicit token instead of the location's own.
	pub fn to_string_with(&self, token: &str) -> String {
		let mut out = self.path.clone();
		if !self.query.is_empty() {
			out.push_str(token);
			out.push_str(&self.query.to_string());
		}
		if !self.fragment.is_empty() {
			out.push(FRAGMENT_SEPARATOR);
			out.push_str(&self.fragment);
		}
		out
	}

	/// Path and query equality. The fragment is ignored.
	///
	/// Paths ending in `/` are compared with this location's index file name
	/// appended, so `/a/` equals `/a/index` when the index is `index`.
	pub fn equal(&self, other: &Location) -> bool {
		path::equal(&self.path, &other.path, &self.index) && self.query.equal(&other.query)
	}

	/// [`Location::equal`] plus identical fragments.
	pub fn equal_with_fragment(&self, other: &Location) -> bool {
		self.equal(other) && self.fragment == other.fragment
	}
}

impl Default for Location {
	fn default() -> Self {
		Self::parse("", &ParseOptions::new())
	}
}

impl PartialEq for Location {
	fn eq(&self, other: &Self) -> bool {
		self.equal(other)
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_string_with(&self.token))
	}
}
