//! Navigation controllers.
//!
//! A controller keeps the router's current location in sync with a
//! [`NavigationHost`]. Three strategies are provided:
//!
//! - [`HashController`]: the location lives in the fragment (`#/path~query`).
//! - [`HistoryController`]: the location is the host path, with history
//!   entries pushed and replaced directly and in-app links intercepted.
//! - [`ReloadController`]: every redirect is a full page load.
//!
//! All of them are `uninitialized` until [`NavigationController::init`] and
//! return to that state on [`NavigationController::dispose`].

mod hash;
mod history;
mod reload;

pub use hash::{HASH_TOKEN, HashController};
pub use history::HistoryController;
pub use reload::ReloadController;

use crate::config::RouterConfig;
use crate::dispatcher::{ApplyNavigation, NavigationEffects};
use crate::error::{RouterError, RouterResult};
use crate::host::{ListenerId, NavigationHost};
use crate::options::NavigateOptions;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use waypost_url::{Location, ParseOptions, Query};

/// A navigation-history strategy.
pub trait NavigationController: Send + Sync {
	/// Short name used in logs.
	fn name(&self) -> &'static str;

	/// Starts listening to the host and dispatches the host's current location.
	///
	/// # Errors
	///
	/// Returns the error of the initial dispatch.
	fn init(&self, config: &RouterConfig, apply: Arc<dyn ApplyNavigation>) -> RouterResult<()>;

	/// Navigates to `url`, resolved against the current location, with `query`
	/// added to its own query.
	///
	/// # Errors
	///
	/// Returns [`RouterError::NotStarted`] before `init`, and dispatch errors.
	fn redirect(&self, url: &str, query: Option<&Query>, options: NavigateOptions) -> RouterResult<()>;

	/// Like [`NavigationController::redirect`], replacing the current history
	/// entry instead of adding one.
	///
	/// # Errors
	///
	/// Returns [`RouterError::NotStarted`] before `init`, and dispatch errors.
	fn reset(&self, url: &str, query: Option<&Query>, options: NavigateOptions) -> RouterResult<()>;

	/// Stops listening and forgets the current location.
	fn dispose(&self);

	/// Returns the last accepted location.
	fn current(&self) -> Option<Location>;

	/// Applies a navigation title to the host.
	fn set_title(&self, _title: &str) {}

	/// Replaces the configuration of a started controller. Locations built
	/// from then on use the new root, index and default path.
	fn configure(&self, _config: &RouterConfig) {}
}

#[derive(Default)]
struct Session {
	apply: Option<Arc<dyn ApplyNavigation>>,
	config: RouterConfig,
	current: Option<Location>,
	listener: Option<ListenerId>,
}

/// State shared by the controllers and their host listeners.
pub(crate) struct ControllerCore {
	name: &'static str,
	host: Arc<dyn NavigationHost>,
	token: &'static str,
	session: Mutex<Session>,
}

impl ControllerCore {
	pub(crate) fn new(name: &'static str, host: Arc<dyn NavigationHost>, token: &'static str) -> Self {
		Self {
			name,
			host,
			token,
			session: Mutex::new(Session::default()),
		}
	}

	pub(crate) fn host(&self) -> &dyn NavigationHost {
		self.host.as_ref()
	}

	pub(crate) fn activate(&self, config: &RouterConfig, apply: Arc<dyn ApplyNavigation>) {
		let previous = {
			let mut session = self.session.lock();
			let previous = session.listener.take();
			*session = Session {
				apply: Some(apply),
				config: config.clone(),
				current: None,
				listener: None,
			};
			previous
		};
		if let Some(id) = previous {
			self.host.unsubscribe(id);
		}
		tracing::debug!(controller = self.name, "controller initialized");
	}

	pub(crate) fn set_listener(&self, id: ListenerId) {
		self.session.lock().listener = Some(id);
	}

	pub(crate) fn deactivate(&self) {
		let listener = std::mem::take(&mut *self.session.lock()).listener;
		if let Some(id) = listener {
			self.host.unsubscribe(id);
		}
		tracing::debug!(controller = self.name, "controller disposed");
	}

	pub(crate) fn set_config(&self, config: &RouterConfig) {
		self.session.lock().config = config.clone();
		tracing::debug!(controller = self.name, "controller reconfigured");
	}

	pub(crate) fn config(&self) -> RouterConfig {
		self.session.lock().config.clone()
	}

	pub(crate) fn apply_handle(&self) -> RouterResult<Arc<dyn ApplyNavigation>> {
		self.session.lock().apply.clone().ok_or(RouterError::NotStarted)
	}

	pub(crate) fn current(&self) -> Option<Location> {
		self.session.lock().current.clone()
	}

	pub(crate) fn record(&self, location: Location) {
		self.session.lock().current = Some(location);
	}

	/// Builds a location from `raw`, resolving against the current location.
	///
	/// An empty `raw` yields the configured default path.
	pub(crate) fn location(&self, raw: &str, query: Option<&Query>) -> Location {
		let (config, current) = {
			let session = self.session.lock();
			(session.config.clone(), session.current.clone())
		};
		let base = if raw.trim().is_empty() { None } else { current.as_ref() };
		let options = ParseOptions::new()
			.token(self.token)
			.index(config.index)
			.default_path(config.path)
			.maybe_base(base)
			.maybe_query(query);
		Location::parse(raw, &options)
	}

	/// Dispatches `location` unless it equals the current one and `force` is
	/// unset. Returns whether it was dispatched.
	///
	/// The location is recorded as current and `write` is applied to the host
	/// right before the handler runs, so navigations started from inside the
	/// handler see it as their base. A navigation coalesced away while another
	/// handler runs leaves no trace, an unmatched location changes nothing, and
	/// a failing handler has both undone.
	pub(crate) fn navigate(
		self: &Arc<Self>,
		location: Location,
		options: NavigateOptions,
		write: HostWrite,
	) -> RouterResult<bool> {
		let apply = self.apply_handle()?;
		if !options.force && self.current().is_some_and(|current| current.equal(&location)) {
			tracing::trace!(controller = self.name, url = %location, "location unchanged");
			return Ok(false);
		}
		apply.resolve(&location)?;
		let effects = CoreEffects {
			core: Arc::downgrade(self),
			write,
			previous: None,
		};
		apply.apply(location, options, Box::new(effects))?;
		Ok(true)
	}
}

/// The host write that accompanies a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostWrite {
	/// The host already shows the location.
	None,
	/// Push a fragment entry.
	SetHash,
	/// Rewrite the current fragment entry.
	ReplaceHash,
	/// Push a history entry.
	PushState { href: String, state: String },
	/// Rewrite the current history entry.
	ReplaceState { href: String, state: String },
}

struct Snapshot {
	current: Option<Location>,
	hash: String,
	href: String,
	state: Option<String>,
}

/// Records the navigation on its controller and writes it to the host.
struct CoreEffects {
	core: Weak<ControllerCore>,
	write: HostWrite,
	previous: Option<Snapshot>,
}

impl NavigationEffects for CoreEffects {
	fn commit(&mut self, location: &Location) {
		let Some(core) = self.core.upgrade() else {
			return;
		};
		let host = core.host();
		let before = host.location();
		self.previous = Some(Snapshot {
			current: core.current(),
			hash: before.hash.clone(),
			href: before.href(),
			state: host.state(),
		});
		core.record(location.clone());
		match &self.write {
			HostWrite::None => {}
			HostWrite::SetHash => host.set_hash(&location.to_string()),
			HostWrite::ReplaceHash => host.replace_hash(&location.to_string()),
			HostWrite::PushState { href, state } => host.push_state(href, Some(state.clone())),
			HostWrite::ReplaceState { href, state } => host.replace_state(href, Some(state.clone())),
		}
	}

	/// Restores the previous current location, then rewrites the host entry
	/// the navigation wrote. A pushed entry stays on the stack. Fragments are
	/// restored in canonical form so the rewrite dispatches nothing.
	fn rollback(&mut self, location: &Location) {
		let (Some(core), Some(previous)) = (self.core.upgrade(), self.previous.take()) else {
			return;
		};
		tracing::debug!(controller = core.name, url = %location, "navigation rolled back");
		let hash = previous
			.current
			.as_ref()
			.map_or(previous.hash, Location::to_string);
		core.session.lock().current = previous.current;
		let host = core.host();
		match &self.write {
			HostWrite::None => {}
			HostWrite::SetHash | HostWrite::ReplaceHash => host.replace_hash(&hash),
			HostWrite::PushState { .. } | HostWrite::ReplaceState { .. } => {
				host.replace_state(&previous.href, previous.state);
			}
		}
	}
}
