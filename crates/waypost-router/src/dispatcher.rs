//! Navigation dispatch.
//!
//! The [`Dispatcher`] resolves a location through the route table and invokes
//! the matched handler. Dispatches never overlap: while a handler is running
//! (or an async handler has not called [`Finish::done`]), further requests are
//! coalesced into a single pending navigation, and only the most recent one is
//! replayed once the running handler completes.
//!
//! A navigation's side effects ([`NavigationEffects`]) are committed right
//! before its handler runs, so a coalesced navigation that is never replayed
//! leaves no trace, and they are rolled back if the handler fails.

use crate::error::RouterResult;
use crate::handler::{RouteHandler, RouteRequest};
use crate::options::NavigateOptions;
use crate::pattern::IntoPattern;
use crate::table::{RouteRule, RouteTable};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use waypost_url::Location;

/// Callback receiving the title of each successful navigation.
pub type TitleSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Outcome of [`Dispatcher::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
	/// The handler ran to completion.
	Completed,
	/// An async handler is still running.
	InFlight,
	/// Another navigation was running; this one is now the pending navigation.
	Queued,
}

/// Side effects a navigation has outside the dispatcher, such as recording
/// the current location and writing a host history entry.
pub trait NavigationEffects: Send {
	/// Applies the effects. Called once the location matched a rule, right
	/// before its handler runs.
	fn commit(&mut self, location: &Location);

	/// Undoes [`NavigationEffects::commit`] after the handler failed.
	fn rollback(&mut self, location: &Location);
}

/// Effects of a navigation nobody else observes.
struct NoEffects;

impl NavigationEffects for NoEffects {
	fn commit(&mut self, _location: &Location) {}

	fn rollback(&mut self, _location: &Location) {}
}

/// The apply capability controllers navigate through.
pub trait ApplyNavigation: Send + Sync {
	/// Checks that `location` resolves to a rule without dispatching.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::RouteNotFound`] if nothing matches.
	fn resolve(&self, location: &Location) -> RouterResult<()>;

	/// Dispatches `location`, committing `effects` when its handler runs.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::RouteNotFound`] if nothing matches, the
	/// handler's own error, or the error of a navigation replayed when the
	/// handler completed.
	fn apply(
		&self,
		location: Location,
		options: NavigateOptions,
		effects: Box<dyn NavigationEffects>,
	) -> RouterResult<Dispatch>;
}

struct Pending {
	location: Location,
	options: NavigateOptions,
	effects: Box<dyn NavigationEffects>,
}

impl std::fmt::Debug for Pending {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Pending")
			.field("location", &self.location.to_string())
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

#[derive(Debug, Default)]
struct DispatchState {
	/// Id of the dispatch holding the dispatcher, if any.
	active: Option<u64>,
	next_id: u64,
	pending: Option<Pending>,
	title: Option<String>,
}

#[derive(Default)]
struct Inner {
	table: RwLock<RouteTable>,
	state: Mutex<DispatchState>,
	title_sink: RwLock<Option<TitleSink>>,
}

/// Route table owner and handler invoker.
///
/// Cloning yields another handle to the same dispatcher.
#[derive(Clone, Default)]
pub struct Dispatcher {
	inner: Arc<Inner>,
}

impl Dispatcher {
	/// Creates a dispatcher with an empty route table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` for `pattern`.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::InvalidPattern`] if the pattern does not
	/// compile and [`crate::RouterError::DuplicateRoute`] if it is already
	/// registered.
	pub fn add(&self, pattern: impl IntoPattern, handler: Arc<dyn RouteHandler>) -> RouterResult<()> {
		let pattern = pattern.into_pattern()?;
		let shown = pattern.to_string();
		self.inner
			.table
			.write()
			.add(RouteRule::new(pattern, handler))?;
		tracing::debug!(pattern = %shown, "route registered");
		Ok(())
	}

	/// Removes the rule registered for `pattern`. Returns whether one existed.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::InvalidPattern`] if the pattern does not
	/// compile.
	pub fn remove(&self, pattern: impl IntoPattern) -> RouterResult<bool> {
		let pattern = pattern.into_pattern()?;
		let removed = self.inner.table.write().remove(&pattern);
		if removed {
			tracing::debug!(pattern = %pattern, "route removed");
		}
		Ok(removed)
	}

	/// Removes every rule, drops the pending navigation and invalidates
	/// outstanding [`Finish`] tokens.
	pub fn clear(&self) {
		self.inner.table.write().clear();
		let mut state = self.inner.state.lock();
		state.active = None;
		state.pending = None;
		tracing::debug!("dispatcher cleared");
	}

	/// Sets the index file name used by literal rules.
	pub fn set_index(&self, index: &str) {
		self.inner.table.write().set_index(index);
	}

	/// Installs the callback receiving navigation titles.
	pub fn set_title_sink(&self, sink: TitleSink) {
		*self.inner.title_sink.write() = Some(sink);
	}

	/// Returns the number of registered rules.
	pub fn len(&self) -> usize {
		self.inner.table.read().len()
	}

	/// Whether no rule is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether a handler is running.
	pub fn is_busy(&self) -> bool {
		self.inner.state.lock().active.is_some()
	}

	/// Whether a navigation is waiting for the running handler.
	pub fn has_pending(&self) -> bool {
		self.inner.state.lock().pending.is_some()
	}

	/// Returns the title of the last navigation that carried one.
	pub fn title(&self) -> Option<String> {
		self.inner.state.lock().title.clone()
	}

	/// Resolves `location` and invokes the matched handler.
	///
	/// While another handler is running the request replaces any earlier
	/// pending navigation and [`Dispatch::Queued`] is returned.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::RouteNotFound`] if nothing matches (no
	/// state changes), the handler's own error, or the error of the pending
	/// navigation replayed when the handler completed.
	pub fn apply(&self, location: Location, options: NavigateOptions) -> RouterResult<Dispatch> {
		self.apply_with(location, options, Box::new(NoEffects))
	}

	/// Like [`Dispatcher::apply`], committing `effects` right before the
	/// handler runs and rolling them back if it fails.
	///
	/// # Errors
	///
	/// See [`Dispatcher::apply`].
	pub fn apply_with(
		&self,
		location: Location,
		options: NavigateOptions,
		mut effects: Box<dyn NavigationEffects>,
	) -> RouterResult<Dispatch> {
		{
			let mut state = self.inner.state.lock();
			if state.active.is_some() {
				tracing::debug!(url = %location, "navigation queued");
				let queued = Pending {
					location,
					options,
					effects,
				};
				if let Some(dropped) = state.pending.replace(queued) {
					tracing::debug!(url = %dropped.location, "pending navigation dropped");
				}
				return Ok(Dispatch::Queued);
			}
		}

		let matched = self.inner.table.read().resolve(&location)?;
		tracing::debug!(path = location.path(), pattern = %matched.pattern, "dispatching");

		let id = {
			let mut state = self.inner.state.lock();
			let id = state.next_id;
			state.next_id += 1;
			state.active = Some(id);
			if let Some(title) = &options.title {
				state.title = Some(title.clone());
			}
			id
		};
		effects.commit(&location);
		if let Some(title) = &options.title {
			let sink = self.inner.title_sink.read().clone();
			if let Some(sink) = sink {
				sink(title);
			}
		}

		let request = RouteRequest {
			path: location.path().to_string(),
			query: location.query_map(),
			params: matched.params,
			url: location.to_string(),
			options,
			location,
		};
		let finish = Finish {
			dispatcher: Arc::downgrade(&self.inner),
			id,
		};

		if let Err(error) = matched.handler.handle(&request, finish) {
			let failed_here = {
				let mut state = self.inner.state.lock();
				let failed_here = state.active == Some(id);
				if failed_here {
					state.active = None;
					if state.pending.take().is_some() {
						tracing::debug!("pending navigation dropped after handler failure");
					}
				}
				failed_here
			};
			// An error returned after completion belongs to the replayed
			// navigation, which rolled itself back.
			if failed_here {
				tracing::debug!(url = %request.url, error = %error, "handler failed, rolling back");
				effects.rollback(&request.location);
			}
			return Err(error);
		}

		let state = self.inner.state.lock();
		if state.active == Some(id) {
			Ok(Dispatch::InFlight)
		} else {
			Ok(Dispatch::Completed)
		}
	}

	fn complete(&self, id: u64) -> RouterResult<Dispatch> {
		let pending = {
			let mut state = self.inner.state.lock();
			if state.active != Some(id) {
				tracing::debug!(id, "stale completion ignored");
				return Ok(Dispatch::Completed);
			}
			state.active = None;
			state.pending.take()
		};

		let Some(Pending {
			location,
			options,
			effects,
		}) = pending
		else {
			return Ok(Dispatch::Completed);
		};
		tracing::debug!(url = %location, "replaying pending navigation");
		let url = location.to_string();
		self.apply_with(location, options, effects).inspect_err(|error| {
			tracing::warn!(url = %url, error = %error, "pending navigation failed");
		})
	}
}

impl ApplyNavigation for Dispatcher {
	fn resolve(&self, location: &Location) -> RouterResult<()> {
		self.inner.table.read().resolve(location).map(|_| ())
	}

	fn apply(
		&self,
		location: Location,
		options: NavigateOptions,
		effects: Box<dyn NavigationEffects>,
	) -> RouterResult<Dispatch> {
		self.apply_with(location, options, effects)
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("table", &*self.inner.table.read())
			.field("state", &*self.inner.state.lock())
			.finish_non_exhaustive()
	}
}

/// Completion token handed to every handler.
///
/// Consumed by [`Finish::done`]. A token issued before [`Dispatcher::clear`]
/// is ignored.
#[must_use = "the dispatcher stays busy until `done` is called"]
pub struct Finish {
	dispatcher: Weak<Inner>,
	id: u64,
}

impl Finish {
	/// Marks the navigation as complete and replays the pending navigation,
	/// if any.
	///
	/// # Errors
	///
	/// Returns the replayed navigation's error.
	pub fn done(self) -> RouterResult<Dispatch> {
		match self.dispatcher.upgrade() {
			Some(inner) => Dispatcher { inner }.complete(self.id),
			None => Ok(Dispatch::Completed),
		}
	}

	#[cfg(test)]
	pub(crate) fn detached() -> Self {
		Self {
			dispatcher: Weak::new(),
			id: 0,
		}
	}
}

impl std::fmt::Debug for Finish {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Finish").field("id", &self.id).finish()
	}
}
