//! The ordered route table.

use crate::error::{RouterError, RouterResult};
use crate::handler::RouteHandler;
use crate::pattern::RoutePattern;
use std::sync::Arc;
use waypost_url::{Location, QueryMap, QueryValue};

/// A registered pattern and its handler.
#[derive(Clone)]
pub struct RouteRule {
	pattern: RoutePattern,
	handler: Arc<dyn RouteHandler>,
}

impl RouteRule {
	/// Creates a rule.
	pub fn new(pattern: RoutePattern, handler: Arc<dyn RouteHandler>) -> Self {
		Self { pattern, handler }
	}

	/// Returns the pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Returns the handler.
	pub fn handler(&self) -> &Arc<dyn RouteHandler> {
		&self.handler
	}
}

impl std::fmt::Debug for RouteRule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteRule")
			.field("pattern", &self.pattern)
			.finish_non_exhaustive()
	}
}

/// The rule a location resolved to.
#[derive(Clone)]
pub struct RouteMatch {
	/// Matched pattern, as displayed.
	pub pattern: String,
	/// Handler to invoke.
	pub handler: Arc<dyn RouteHandler>,
	/// Captures merged with the location's query.
	pub params: QueryMap,
}

/// Positional rules in insertion order plus an optional default rule.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	rules: Vec<RouteRule>,
	fallback: Option<RouteRule>,
	index: String,
}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the index file name used by literal rules.
	pub fn set_index(&mut self, index: impl Into<String>) {
		self.index = index.into();
	}

	/// Registers a rule.
	///
	/// # Errors
	///
	/// Returns [`RouterError::DuplicateRoute`] if an equal pattern is already
	/// registered. The table is left unchanged.
	pub fn add(&mut self, rule: RouteRule) -> RouterResult<()> {
		if self.contains(&rule.pattern) {
			return Err(RouterError::DuplicateRoute(rule.pattern.to_string()));
		}
		if rule.pattern.is_default() {
			self.fallback = Some(rule);
		} else {
			self.rules.push(rule);
		}
		Ok(())
	}

	/// Removes the rule with an equal pattern. Returns whether one existed.
	pub fn remove(&mut self, pattern: &RoutePattern) -> bool {
		if pattern.is_default() {
			return self.fallback.take().is_some();
		}
		match self.position(pattern) {
			Some(index) => {
				self.rules.remove(index);
				true
			}
			None => false,
		}
	}

	/// Removes every rule.
	pub fn clear(&mut self) {
		self.rules.clear();
		self.fallback = None;
	}

	/// Whether a rule with an equal pattern is registered.
	pub fn contains(&self, pattern: &RoutePattern) -> bool {
		if pattern.is_default() {
			self.fallback.is_some()
		} else {
			self.position(pattern).is_some()
		}
	}

	/// Returns the number of rules, the default rule included.
	pub fn len(&self) -> usize {
		self.rules.len() + usize::from(self.fallback.is_some())
	}

	/// Whether no rule is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Resolves `location` to the first matching positional rule, or the
	/// default rule.
	///
	/// # Errors
	///
	/// Returns [`RouterError::RouteNotFound`] if nothing matches.
	pub fn resolve(&self, location: &Location) -> RouterResult<RouteMatch> {
		let path = location.path();
		let found = self.rules.iter().find_map(|rule| {
			rule.pattern
				.matches(path, &self.index)
				.map(|captures| (rule, captures))
		});
		let (rule, captures) = match (found, &self.fallback) {
			(Some(found), _) => found,
			(None, Some(fallback)) => (fallback, Vec::new()),
			(None, None) => return Err(RouterError::RouteNotFound(path.to_string())),
		};

		let mut params: QueryMap = captures
			.into_iter()
			.map(|(name, value)| (name, QueryValue::Single(value)))
			.collect();
		params.extend(location.query_map());

		Ok(RouteMatch {
			pattern: rule.pattern.to_string(),
			handler: Arc::clone(&rule.handler),
			params,
		})
	}

	fn position(&self, pattern: &RoutePattern) -> Option<usize> {
		self.rules
			.iter()
			.position(|rule| rule.pattern.same_pattern(pattern))
	}
}
