//! Per-navigation options.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn is_false(value: &bool) -> bool {
	!*value
}

/// Options accompanying a `redirect` or `reset`.
///
/// `force` and `silent` steer the controllers, `title` is applied by the
/// dispatcher after a successful match, and any other key travels untouched
/// to the handler (and into the history state payload).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigateOptions {
	/// Dispatch even when the target equals the current location.
	#[serde(default, skip_serializing_if = "is_false")]
	pub force: bool,

	/// Record the location without invoking the dispatcher.
	#[serde(default, skip_serializing_if = "is_false")]
	pub silent: bool,

	/// Page title applied after a successful match.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,

	/// Application-defined values.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl NavigateOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `force`.
	pub fn force(mut self) -> Self {
		self.force = true;
		self
	}

	/// Sets `silent`.
	pub fn silent(mut self) -> Self {
		self.silent = true;
		self
	}

	/// Sets the page title.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Adds an application-defined value.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}

	/// Returns an application-defined value.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.extra.get(key)
	}

	/// Drops the one-shot control flags, keeping title and extra values.
	pub(crate) fn without_flags(mut self) -> Self {
		self.force = false;
		self.silent = false;
		self
	}
}
