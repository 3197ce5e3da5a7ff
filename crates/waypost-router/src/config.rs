//! Router settings.
//!
//! Settings can be built in code, merged from partial updates, or loaded from
//! TOML.

use crate::error::{RouterError, RouterResult};
use serde::{Deserialize, Serialize};
use waypost_url::path;

/// Router-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// Index file name appended to directory paths when comparing locations.
	pub index: String,

	/// Path used when the host location is empty.
	pub path: String,

	/// Prefix stripped from host paths on read and prepended on write by the
	/// history and reload controllers.
	pub root: String,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			index: String::new(),
			path: path::ROOT.to_string(),
			root: String::new(),
		}
	}
}

impl RouterConfig {
	/// Parses settings from TOML. Missing fields keep their defaults.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidConfig`] if the document is not valid
	/// TOML or a field has the wrong type.
	pub fn from_toml_str(content: &str) -> RouterResult<Self> {
		toml::from_str(content).map_err(|e| RouterError::InvalidConfig(e.to_string()))
	}

	/// Applies every field present in `update`.
	pub fn merge(&mut self, update: ConfigUpdate) {
		if let Some(index) = update.index {
			self.index = index;
		}
		if let Some(path) = update.path {
			self.path = path;
		}
		if let Some(root) = update.root {
			self.root = root;
		}
	}

	/// Prepends the root prefix to an absolute location string.
	pub fn with_root(&self, url: &str) -> String {
		let root = self.root.trim_end_matches(path::SEPARATOR);
		format!("{}{}", root, url)
	}

	/// Strips the root prefix from a host path.
	///
	/// Paths outside the root are returned unchanged. The result is never
	/// empty.
	pub fn strip_root<'a>(&self, pathname: &'a str) -> &'a str {
		let root = self.root.trim_end_matches(path::SEPARATOR);
		let stripped = match pathname.strip_prefix(root) {
			Some(rest) if !root.is_empty() && (rest.is_empty() || path::is_absolute(rest)) => rest,
			_ => pathname,
		};
		if stripped.is_empty() { path::ROOT } else { stripped }
	}
}

/// A partial settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
	/// New index file name.
	pub index: Option<String>,
	/// New default path.
	pub path: Option<String>,
	/// New root prefix.
	pub root: Option<String>,
}

impl ConfigUpdate {
	/// Creates an empty update.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the index file name.
	pub fn index(mut self, index: impl Into<String>) -> Self {
		self.index = Some(index.into());
		self
	}

	/// Sets the default path.
	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Sets the root prefix.
	pub fn root(mut self, root: impl Into<String>) -> Self {
		self.root = Some(root.into());
		self
	}
}

impl From<RouterConfig> for ConfigUpdate {
	fn from(config: RouterConfig) -> Self {
		Self {
			index: Some(config.index),
			path: Some(config.path),
			root: Some(config.root),
		}
	}
}
