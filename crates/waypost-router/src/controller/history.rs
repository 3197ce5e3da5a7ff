//! History-stack navigation.
//!
//! The location is the host path (below the configured root). Redirects push
//! a host entry carrying a [`HistoryState`] payload, resets replace the
//! current entry, and traversal (`PopState`) dispatches the entry's location
//! with the options stored in its payload. Activated in-app links are turned
//! into redirects.

use super::{ControllerCore, HostWrite, NavigationController};
use crate::config::RouterConfig;
use crate::dispatcher::ApplyNavigation;
use crate::error::RouterResult;
use crate::host::{EventOutcome, HistoryState, HostEvent, LinkActivation, NavigationHost};
use crate::options::NavigateOptions;
use std::sync::Arc;
use waypost_url::{DEFAULT_TOKEN, Location, Query};

/// Controller driving the host history stack directly.
pub struct HistoryController {
	core: Arc<ControllerCore>,
}

impl HistoryController {
	/// Creates a controller for `host`.
	pub fn new(host: Arc<dyn NavigationHost>) -> Self {
		Self {
			core: Arc::new(ControllerCore::new("history", host, DEFAULT_TOKEN)),
		}
	}
}

fn host_url(core: &ControllerCore) -> String {
	let location = core.host().location();
	let config = core.config();
	let mut raw = config.strip_root(&location.pathname).to_string();
	if !location.search.is_empty() {
		raw.push_str(DEFAULT_TOKEN);
		raw.push_str(&location.search);
	}
	if !location.hash.is_empty() {
		raw.push('#');
		raw.push_str(&location.hash);
	}
	raw
}

fn stored_options(state: Option<&str>) -> NavigateOptions {
	let Some(raw) = state else {
		return NavigateOptions::new();
	};
	match HistoryState::from_json(raw) {
		Ok(state) => state.options.without_flags(),
		Err(error) => {
			tracing::warn!(error = %error, "ignoring undecodable history state");
			NavigateOptions::new()
		}
	}
}

fn monitor(core: &Arc<ControllerCore>, state: Option<&str>) -> RouterResult<()> {
	let location = core.location(&host_url(core), None);
	core.navigate(location, stored_options(state), HostWrite::None)?;
	Ok(())
}

fn redirect(
	core: &Arc<ControllerCore>,
	url: &str,
	query: Option<&Query>,
	options: NavigateOptions,
) -> RouterResult<()> {
	core.apply_handle()?;
	let location = core.location(url, query);
	if options.silent {
		tracing::debug!(url = %location, "silent redirect recorded");
		core.record(location);
		return Ok(());
	}
	let state = HistoryState::new(&location, &options).to_json()?;
	let href = core.config().with_root(&location.to_string());
	core.navigate(location, options, HostWrite::PushState { href, state })?;
	Ok(())
}

fn intercept(core: &Arc<ControllerCore>, link: &LinkActivation) -> EventOutcome {
	let Some(href) = link.in_app_href() else {
		return EventOutcome::Continue;
	};
	match redirect(core, href, None, NavigateOptions::new()) {
		Ok(()) => EventOutcome::PreventDefault,
		Err(error) => {
			tracing::warn!(href, error = %error, "link left to the host");
			EventOutcome::Continue
		}
	}
}

impl NavigationController for HistoryController {
	fn name(&self) -> &'static str {
		"history"
	}

	fn init(&self, config: &RouterConfig, apply: Arc<dyn ApplyNavigation>) -> RouterResult<()> {
		self.core.activate(config, apply);
		let weak = Arc::downgrade(&self.core);
		let id = self.core.host().subscribe(Arc::new(move |event: &HostEvent| {
			let Some(core) = weak.upgrade() else {
				return EventOutcome::Continue;
			};
			match event {
				HostEvent::PopState { state } => {
					if let Err(error) = monitor(&core, state.as_deref()) {
						tracing::warn!(error = %error, "history navigation failed");
					}
					EventOutcome::Continue
				}
				HostEvent::LinkActivated(link) => intercept(&core, link),
				HostEvent::HashChange => EventOutcome::Continue,
			}
		}));
		self.core.set_listener(id);
		monitor(&self.core, self.core.host().state().as_deref())
	}

	fn redirect(&self, url: &str, query: Option<&Query>, options: NavigateOptions) -> RouterResult<()> {
		redirect(&self.core, url, query, options)
	}

	fn reset(&self, url: &str, query: Option<&Query>, options: NavigateOptions) -> RouterResult<()> {
		self.core.apply_handle()?;
		let location = self.core.location(url, query);
		let state = HistoryState::new(&location, &options).to_json()?;
		let href = self.core.config().with_root(&location.to_string());
		if options.silent {
			self.core.record(location);
		} else {
			let write = HostWrite::ReplaceState {
				href: href.clone(),
				state: state.clone(),
			};
			if self.core.navigate(location, options, write)? {
				return Ok(());
			}
		}
		self.core.host().replace_state(&href, Some(state));
		Ok(())
	}

	fn dispose(&self) {
		self.core.deactivate();
	}

	fn configure(&self, config: &RouterConfig) {
		self.core.set_config(config);
	}

	fn current(&self) -> Option<Location> {
		self.core.current()
	}

	fn set_title(&self, title: &str) {
		self.core.host().set_title(title);
	}
}
