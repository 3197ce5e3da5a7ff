//! Route patterns.
//!
//! A pattern is chosen once at registration:
//!
//! - `""` registers the default (fallback) rule.
//! - A string with a `:name` segment is a template, e.g.
//!   `/item/:id/comments/:page/re`. Each `:name` segment captures one path
//!   segment.
//! - Any other string is a literal path.
//! - A [`Regex`] is used as-is. Unnamed groups are bound to `$1`, `$2`, ...
//!
//! Template and regex patterns are not anchored at the start, so they match
//! the tail of a path. Literal patterns compare whole, index-normalized paths.

use crate::error::{RouterError, RouterResult};
use regex::{Regex, RegexBuilder};
use std::fmt;
use waypost_url::path;

/// Marker that introduces a template parameter segment.
pub const PARAM_MARKER: char = ':';

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A compiled `:name` template.
#[derive(Debug, Clone)]
pub struct Template {
	source: String,
	regex: Regex,
	param_names: Vec<String>,
}

impl Template {
	/// Compiles a template string.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if the template is too long or
	/// compiles to an oversized expression.
	pub fn new(source: &str) -> RouterResult<Self> {
		if source.len() > MAX_PATTERN_LENGTH {
			return Err(RouterError::InvalidPattern {
				pattern: source.to_string(),
				reason: format!(
					"pattern length {} exceeds maximum allowed length of {} bytes",
					source.len(),
					MAX_PATTERN_LENGTH
				),
			});
		}

		let mut param_names = Vec::new();
		let segments: Vec<String> = source
			.split(path::SEPARATOR)
			.map(|segment| match param_name(segment) {
				Some(name) => {
					param_names.push(name.to_string());
					"([^/]+)".to_string()
				}
				None => regex::escape(segment),
			})
			.collect();
		let regex_str = format!("{}$", segments.join("/"));

		Ok(Self {
			source: source.to_string(),
			regex: build_regex(source, &regex_str)?,
			param_names,
		})
	}

	/// Returns the template as registered.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Returns the compiled expression.
	pub fn regex(&self) -> &Regex {
		&self.regex
	}

	/// Returns the parameter names in declaration order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}
}

/// A route pattern.
#[derive(Debug, Clone)]
pub enum RoutePattern {
	/// Fallback used only when no positional rule matches.
	Default,
	/// Exact, index-normalized path.
	Literal(String),
	/// Raw regular expression.
	Regex(Regex),
	/// `:name` template compiled to a regular expression.
	Template(Template),
}

impl RoutePattern {
	/// Classifies and compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if a template fails to compile.
	pub fn parse(pattern: &str) -> RouterResult<Self> {
		if pattern.is_empty() {
			Ok(Self::Default)
		} else if pattern.split(path::SEPARATOR).any(|s| param_name(s).is_some()) {
			Template::new(pattern).map(Self::Template)
		} else {
			Ok(Self::Literal(pattern.to_string()))
		}
	}

	/// Compiles a regular expression pattern with the router's size limit.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if the expression is malformed
	/// or too large.
	pub fn regex(expression: &str) -> RouterResult<Self> {
		build_regex(expression, expression).map(Self::Regex)
	}

	/// Whether this is the fallback pattern.
	pub fn is_default(&self) -> bool {
		matches!(self, Self::Default)
	}

	/// Whether two patterns are the same rule.
	///
	/// Literal and template patterns compare their source strings, regular
	/// expressions compare their serialized form.
	pub fn same_pattern(&self, other: &RoutePattern) -> bool {
		match (self, other) {
			(Self::Default, Self::Default) => true,
			(Self::Literal(a), Self::Literal(b)) => a == b,
			(Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
			(Self::Template(a), Self::Template(b)) => a.source == b.source,
			_ => false,
		}
	}

	/// Matches `candidate` and returns the captured parameters.
	///
	/// Literal patterns compare paths with `index` appended to directory
	/// paths. Captured values are percent-decoded. The default pattern never
	/// matches here; the route table applies it as a fallback.
	pub fn matches(&self, candidate: &str, index: &str) -> Option<Vec<(String, String)>> {
		match self {
			Self::Default => None,
			Self::Literal(literal) => path::equal(literal, candidate, index).then(Vec::new),
			Self::Regex(regex) => {
				let names: Vec<Option<&str>> = regex.capture_names().collect();
				captures(regex, candidate, |i| names.get(i).copied().flatten())
			}
			Self::Template(template) => captures(&template.regex, candidate, |i| {
				template.param_names.get(i - 1).map(String::as_str)
			}),
		}
	}
}

impl fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Default => Ok(()),
			Self::Literal(literal) => f.write_str(literal),
			Self::Regex(regex) => f.write_str(regex.as_str()),
			Self::Template(template) => f.write_str(&template.source),
		}
	}
}

/// Conversion into a [`RoutePattern`] at registration time.
pub trait IntoPattern {
	/// Performs the conversion.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if compilation fails.
	fn into_pattern(self) -> RouterResult<RoutePattern>;
}

impl IntoPattern for RoutePattern {
	fn into_pattern(self) -> RouterResult<RoutePattern> {
		Ok(self)
	}
}

impl IntoPattern for &str {
	fn into_pattern(self) -> RouterResult<RoutePattern> {
		RoutePattern::parse(self)
	}
}

impl IntoPattern for String {
	fn into_pattern(self) -> RouterResult<RoutePattern> {
		RoutePattern::parse(&self)
	}
}

impl IntoPattern for &String {
	fn into_pattern(self) -> RouterResult<RoutePattern> {
		RoutePattern::parse(self)
	}
}

impl IntoPattern for Regex {
	fn into_pattern(self) -> RouterResult<RoutePattern> {
		Ok(RoutePattern::Regex(self))
	}
}

impl IntoPattern for &Regex {
	fn into_pattern(self) -> RouterResult<RoutePattern> {
		Ok(RoutePattern::Regex(self.clone()))
	}
}

fn param_name(segment: &str) -> Option<&str> {
	segment
		.strip_prefix(PARAM_MARKER)
		.filter(|name| !name.is_empty())
}

fn build_regex(pattern: &str, expression: &str) -> RouterResult<Regex> {
	RegexBuilder::new(expression)
		.size_limit(MAX_REGEX_SIZE)
		.build()
		.map_err(|e| RouterError::InvalidPattern {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		})
}

fn captures<'n>(
	regex: &Regex,
	candidate: &str,
	name_of: impl Fn(usize) -> Option<&'n str>,
) -> Option<Vec<(String, String)>> {
	let caps = regex.captures(candidate)?;
	let params = (1..caps.len())
		.filter_map(|i| {
			let value = caps.get(i)?.as_str();
			let name = name_of(i).map_or_else(|| format!("${}", i), str::to_string);
			Some((name, decode(value)))
		})
		.collect();
	Some(params)
}

fn decode(raw: &str) -> String {
	urlencoding::decode(raw)
		.map(|decoded| decoded.into_owned())
		.unwrap_or_else(|_| raw.to_string())
}
