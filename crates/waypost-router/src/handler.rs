//! Route handler abstractions.
//!
//! Handlers are chosen explicitly at registration:
//!
//! - [`sync_handler`] wraps `Fn(&RouteRequest)`; the navigation completes when
//!   the closure returns.
//! - [`try_handler`] wraps `Fn(&RouteRequest) -> RouterResult<()>`; a failure
//!   propagates to whoever started the navigation.
//! - [`async_handler`] wraps `Fn(&RouteRequest, Finish)`; the dispatcher stays
//!   busy until [`Finish::done`] is called.

use crate::dispatcher::Finish;
use crate::error::RouterResult;
use crate::options::NavigateOptions;
use std::sync::Arc;
use waypost_url::{Location, QueryMap};

/// Everything a handler receives about one navigation.
#[derive(Debug, Clone)]
pub struct RouteRequest {
	/// Absolute path of the location.
	pub path: String,
	/// Decoded query of the location.
	pub query: QueryMap,
	/// Path captures merged with the query; query values win on collision.
	pub params: QueryMap,
	/// Serialized location.
	pub url: String,
	/// Options the navigation was issued with.
	pub options: NavigateOptions,
	/// The location itself.
	pub location: Location,
}

/// Trait for route handlers.
///
/// Implementations must eventually consume `finish`, either before returning
/// or later from elsewhere. Dropping it without calling [`Finish::done`]
/// leaves the dispatcher busy.
pub trait RouteHandler: Send + Sync {
	/// Handles one navigation.
	///
	/// # Errors
	///
	/// Errors are returned unchanged to the caller of the navigation.
	fn handle(&self, request: &RouteRequest, finish: Finish) -> RouterResult<()>;
}

/// Handler that completes when its closure returns.
pub(crate) struct SyncHandler<F> {
	handler: F,
}

impl<F> SyncHandler<F> {
	pub(crate) fn new(handler: F) -> Self {
		Self { handler }
	}
}

impl<F> RouteHandler for SyncHandler<F>
where
	F: Fn(&RouteRequest) + Send + Sync,
{
	fn handle(&self, request: &RouteRequest, finish: Finish) -> RouterResult<()> {
		(self.handler)(request);
		// Completion replays navigations queued by the closure.
		finish.done().map(|_| ())
	}
}

/// Handler whose closure may fail.
pub(crate) struct TryHandler<F> {
	handler: F,
}

impl<F> TryHandler<F> {
	pub(crate) fn new(handler: F) -> Self {
		Self { handler }
	}
}

impl<F> RouteHandler for TryHandler<F>
where
	F: Fn(&RouteRequest) -> RouterResult<()> + Send + Sync,
{
	fn handle(&self, request: &RouteRequest, finish: Finish) -> RouterResult<()> {
		(self.handler)(request)?;
		finish.done().map(|_| ())
	}
}

/// Handler that signals completion through [`Finish`].
pub(crate) struct AsyncHandler<F> {
	handler: F,
}

impl<F> AsyncHandler<F> {
	pub(crate) fn new(handler: F) -> Self {
		Self { handler }
	}
}

impl<F> RouteHandler for AsyncHandler<F>
where
	F: Fn(&RouteRequest, Finish) + Send + Sync,
{
	fn handle(&self, request: &RouteRequest, finish: Finish) -> RouterResult<()> {
		(self.handler)(request, finish);
		Ok(())
	}
}

/// Creates a handler that completes when `handler` returns.
pub fn sync_handler<F>(handler: F) -> Arc<dyn RouteHandler>
where
	F: Fn(&RouteRequest) + Send + Sync + 'static,
{
	Arc::new(SyncHandler::new(handler))
}

/// Creates a handler whose errors propagate to the navigation's caller.
pub fn try_handler<F>(handler: F) -> Arc<dyn RouteHandler>
where
	F: Fn(&RouteRequest) -> RouterResult<()> + Send + Sync + 'static,
{
	Arc::new(TryHandler::new(handler))
}

/// Creates a handler that completes when it calls [`Finish::done`].
pub fn async_handler<F>(handler: F) -> Arc<dyn RouteHandler>
where
	F: Fn(&RouteRequest, Finish) + Send + Sync + 'static,
{
	Arc::new(AsyncHandler::new(handler))
}
