//! The router façade.
//!
//! [`Router`] owns the dispatcher (and through it the route table), the
//! settings and the active navigation controller. Every navigation goes
//! through the controller, which hands accepted locations to the dispatcher.

use crate::config::{ConfigUpdate, RouterConfig};
use crate::controller::{HashController, HistoryController, NavigationController, ReloadController};
use crate::dispatcher::{ApplyNavigation, Dispatcher, Finish};
use crate::error::RouterResult;
use crate::handler::{RouteHandler, RouteRequest, async_handler, sync_handler, try_handler};
use crate::host::NavigationHost;
use crate::options::NavigateOptions;
use crate::pattern::{IntoPattern, RoutePattern};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use waypost_url::{Location, Query};

type ControllerSlot = Arc<RwLock<Arc<dyn NavigationController>>>;

/// A client-side navigation router.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use waypost_router::{NavigateOptions, Router};
/// use waypost_router::host::{MemoryHistory, NavigationHost};
///
/// let host = MemoryHistory::shared("/");
/// let router = Router::history(host.clone());
/// router.add("/", |_| {}).unwrap();
/// router.add("/item/:id", |req| {
///     assert_eq!(req.params["id"].first(), Some("7"));
/// }).unwrap();
///
/// router.start().unwrap();
/// router.redirect("/item/7", None, NavigateOptions::new()).unwrap();
///
/// assert_eq!(host.location().pathname, "/item/7");
/// ```
pub struct Router {
	dispatcher: Dispatcher,
	controller: ControllerSlot,
	config: RwLock<RouterConfig>,
	started: AtomicBool,
}

impl Router {
	/// Creates a router driven by `controller`.
	pub fn new(controller: Arc<dyn NavigationController>) -> Self {
		let dispatcher = Dispatcher::new();
		let controller: ControllerSlot = Arc::new(RwLock::new(controller));
		let slot = Arc::downgrade(&controller);
		dispatcher.set_title_sink(Arc::new(move |title: &str| {
			if let Some(slot) = slot.upgrade() {
				let controller = Arc::clone(&*slot.read());
				controller.set_title(title);
			}
		}));
		Self {
			dispatcher,
			controller,
			config: RwLock::new(RouterConfig::default()),
			started: AtomicBool::new(false),
		}
	}

	/// Creates a router keeping the location in the fragment of `host`.
	pub fn hash(host: Arc<dyn NavigationHost>) -> Self {
		Self::new(Arc::new(HashController::new(host)))
	}

	/// Creates a router driving the history stack of `host`.
	pub fn history(host: Arc<dyn NavigationHost>) -> Self {
		Self::new(Arc::new(HistoryController::new(host)))
	}

	/// Creates a router that reloads `host` on every redirect.
	pub fn reload(host: Arc<dyn NavigationHost>) -> Self {
		Self::new(Arc::new(ReloadController::new(host)))
	}

	/// Registers a handler that completes when it returns.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::DuplicateRoute`] if the pattern is already
	/// registered, or [`crate::RouterError::InvalidPattern`].
	pub fn add<F>(&self, pattern: impl IntoPattern, handler: F) -> RouterResult<()>
	where
		F: Fn(&RouteRequest) + Send + Sync + 'static,
	{
		self.dispatcher.add(pattern, sync_handler(handler))
	}

	/// Registers a handler whose errors propagate to the navigation's caller.
	///
	/// # Errors
	///
	/// See [`Router::add`].
	pub fn add_fallible<F>(&self, pattern: impl IntoPattern, handler: F) -> RouterResult<()>
	where
		F: Fn(&RouteRequest) -> RouterResult<()> + Send + Sync + 'static,
	{
		self.dispatcher.add(pattern, try_handler(handler))
	}

	/// Registers a handler that completes when it calls [`Finish::done`].
	///
	/// # Errors
	///
	/// See [`Router::add`].
	pub fn add_async<F>(&self, pattern: impl IntoPattern, handler: F) -> RouterResult<()>
	where
		F: Fn(&RouteRequest, Finish) + Send + Sync + 'static,
	{
		self.dispatcher.add(pattern, async_handler(handler))
	}

	/// Registers a custom [`RouteHandler`].
	///
	/// # Errors
	///
	/// See [`Router::add`].
	pub fn add_handler(&self, pattern: impl IntoPattern, handler: Arc<dyn RouteHandler>) -> RouterResult<()> {
		self.dispatcher.add(pattern, handler)
	}

	/// Registers the default rule, used when no other rule matches.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::DuplicateRoute`] if a default rule exists.
	pub fn fallback<F>(&self, handler: F) -> RouterResult<()>
	where
		F: Fn(&RouteRequest) + Send + Sync + 'static,
	{
		self.dispatcher.add(RoutePattern::Default, sync_handler(handler))
	}

	/// Removes the rule registered for `pattern`. Returns whether one existed.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::InvalidPattern`] if the pattern does not
	/// compile.
	pub fn remove(&self, pattern: impl IntoPattern) -> RouterResult<bool> {
		self.dispatcher.remove(pattern)
	}

	/// Removes every rule and drops any pending navigation.
	pub fn clear(&self) {
		self.dispatcher.clear();
	}

	/// Merges `update` into the settings. A started controller picks the new
	/// settings up from its next navigation.
	pub fn config(&self, update: ConfigUpdate) {
		let config = {
			let mut config = self.config.write();
			config.merge(update);
			config.clone()
		};
		self.dispatcher.set_index(&config.index);
		if self.is_started() {
			self.active_controller().configure(&config);
		}
	}

	/// Returns a copy of the settings.
	pub fn settings(&self) -> RouterConfig {
		self.config.read().clone()
	}

	/// Initializes the controller, which dispatches the host's current
	/// location.
	///
	/// Starting a started router re-initializes its controller.
	///
	/// # Errors
	///
	/// Returns the error of the initial dispatch. The router stays started and
	/// keeps following host navigation.
	pub fn start(&self) -> RouterResult<()> {
		let controller = self.active_controller();
		if self.started.swap(true, Ordering::SeqCst) {
			controller.dispose();
		}
		let config = self.settings();
		self.dispatcher.set_index(&config.index);
		tracing::debug!(controller = controller.name(), "router starting");
		controller.init(&config, self.apply())
	}

	/// Merges `update` into the settings and starts.
	///
	/// # Errors
	///
	/// See [`Router::start`].
	pub fn start_with(&self, update: ConfigUpdate) -> RouterResult<()> {
		self.config(update);
		self.start()
	}

	/// Disposes the controller and clears the route table.
	pub fn stop(&self) {
		if self.started.swap(false, Ordering::SeqCst) {
			self.active_controller().dispose();
		}
		self.clear();
		tracing::debug!("router stopped");
	}

	/// Whether [`Router::start`] has been called since the last stop.
	pub fn is_started(&self) -> bool {
		self.started.load(Ordering::SeqCst)
	}

	/// Navigates to `url` through the active controller.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::NotStarted`] before `start`,
	/// [`crate::RouterError::RouteNotFound`] for unmatched locations, and
	/// handler errors.
	pub fn redirect(&self, url: &str, query: Option<&Query>, options: NavigateOptions) -> RouterResult<()> {
		self.active_controller().redirect(url, query, options)
	}

	/// Replaces the current location through the active controller.
	///
	/// # Errors
	///
	/// See [`Router::redirect`].
	pub fn reset(&self, url: &str, query: Option<&Query>, options: NavigateOptions) -> RouterResult<()> {
		self.active_controller().reset(url, query, options)
	}

	/// Swaps the navigation controller. A started router disposes the old one
	/// and initializes the new one.
	///
	/// # Errors
	///
	/// Returns the new controller's initial dispatch error.
	pub fn set_controller(&self, controller: Arc<dyn NavigationController>) -> RouterResult<()> {
		let previous = std::mem::replace(&mut *self.controller.write(), Arc::clone(&controller));
		tracing::debug!(from = previous.name(), to = controller.name(), "controller swapped");
		if !self.is_started() {
			return Ok(());
		}
		previous.dispose();
		controller.init(&self.settings(), self.apply())
	}

	/// Returns the active controller.
	pub fn controller(&self) -> Arc<dyn NavigationController> {
		self.active_controller()
	}

	/// Returns the last accepted location.
	pub fn current(&self) -> Option<Location> {
		self.active_controller().current()
	}

	/// Returns the dispatcher.
	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	fn active_controller(&self) -> Arc<dyn NavigationController> {
		Arc::clone(&*self.controller.read())
	}

	fn apply(&self) -> Arc<dyn ApplyNavigation> {
		Arc::new(self.dispatcher.clone())
	}
}

impl Drop for Router {
	fn drop(&mut self) {
		if self.is_started() {
			self.active_controller().dispose();
		}
	}
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("controller", &self.active_controller().name())
			.field("config", &*self.config.read())
			.field("started", &self.is_started())
			.field("dispatcher", &self.dispatcher)
			.finish()
	}
}
