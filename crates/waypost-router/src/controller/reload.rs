//! Full page reload navigation.
//!
//! Each page load dispatches once from the host path on `init`; every redirect
//! hands the new location to the host as a top-level navigation. Nothing
//! happens in-page after that, so `reset` has nothing to do.

use super::{ControllerCore, HostWrite, NavigationController};
use crate::config::RouterConfig;
use crate::dispatcher::ApplyNavigation;
use crate::error::RouterResult;
use crate::host::NavigationHost;
use crate::options::NavigateOptions;
use std::sync::Arc;
use waypost_url::{DEFAULT_TOKEN, Location, Query};

/// Controller that reloads the page on every redirect.
pub struct ReloadController {
	core: Arc<ControllerCore>,
}

impl ReloadController {
	/// Creates a controller for `host`.
	pub fn new(host: Arc<dyn NavigationHost>) -> Self {
		Self {
			core: Arc::new(ControllerCore::new("reload", host, DEFAULT_TOKEN)),
		}
	}
}

impl NavigationController for ReloadController {
	fn name(&self) -> &'static str {
		"reload"
	}

	fn init(&self, config: &RouterConfig, apply: Arc<dyn ApplyNavigation>) -> RouterResult<()> {
		self.core.activate(config, apply);
		let host = self.core.host().location();
		let mut raw = config.strip_root(&host.pathname).to_string();
		if !host.search.is_empty() {
			raw.push_str(DEFAULT_TOKEN);
			raw.push_str(&host.search);
		}
		let location = self.core.location(&raw, None);
		self.core.navigate(location, NavigateOptions::new(), HostWrite::None)?;
		Ok(())
	}

	fn redirect(&self, url: &str, query: Option<&Query>, _options: NavigateOptions) -> RouterResult<()> {
		self.core.apply_handle()?;
		let location = self.core.location(url, query);
		let href = self.core.config().with_root(&location.to_string());
		tracing::debug!(href = %href, "full page navigation");
		self.core.record(location);
		self.core.host().assign(&href);
		Ok(())
	}

	fn reset(&self, _url: &str, _query: Option<&Query>, _options: NavigateOptions) -> RouterResult<()> {
		Ok(())
	}

	/// Leaves the host alone and forgets the session, so redirects fail with
	/// [`crate::RouterError::NotStarted`] until the next `init`.
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
