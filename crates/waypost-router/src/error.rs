//! Error types for routing and navigation.

use thiserror::Error;

/// Errors returned by the route table, the dispatcher and the controllers.
#[derive(Debug, Error)]
pub enum RouterError {
	/// A rule with an equal normalized pattern is already registered.
	#[error("Route already exists: {0}")]
	DuplicateRoute(String),

	/// No positional rule matched and no default rule is registered.
	#[error("Route not found: {0}")]
	RouteNotFound(String),

	/// A template or regular expression pattern could not be compiled.
	#[error("Invalid route pattern {pattern:?}: {reason}")]
	InvalidPattern {
		/// Pattern source as given at registration.
		pattern: String,
		/// Compiler message.
		reason: String,
	},

	/// Navigation was requested before the controller was initialized.
	#[error("Navigation controller is not started")]
	NotStarted,

	/// Configuration text could not be parsed.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	/// A history state payload could not be encoded.
	#[error("History state error: {0}")]
	HistoryState(#[from] serde_json::Error),
}

/// Result type alias for router operations.
pub type RouterResult<T> = Result<T, RouterError>;
