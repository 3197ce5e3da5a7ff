//! Fragment-based navigation.
//!
//! The location is kept in the host fragment as `#/path~query`. A relative
//! fragment entered by the user (`#../list`) is resolved against the current
//! location, dispatched, and then rewritten in place to its absolute form. The
//! rewrite can only replace the entry the relative jump created, so going back
//! from a relative jump that landed on the current page shows the same
//! location twice.

use super::{ControllerCore, HostWrite, NavigationController};
use crate::config::RouterConfig;
use crate::dispatcher::ApplyNavigation;
use crate::error::RouterResult;
use crate::host::{EventOutcome, HostEvent, NavigationHost};
use crate::options::NavigateOptions;
use std::sync::Arc;
use waypost_url::{Location, Query, path};

/// Separator between path and query inside the fragment.
pub const HASH_TOKEN: &str = "~";

/// Controller keeping the location in the host fragment.
pub struct HashController {
	core: Arc<ControllerCore>,
}

impl HashController {
	/// Creates a controller for `host`.
	pub fn new(host: Arc<dyn NavigationHost>) -> Self {
		Self {
			core: Arc::new(ControllerCore::new("hash", host, HASH_TOKEN)),
		}
	}
}

fn monitor(core: &Arc<ControllerCore>) -> RouterResult<()> {
	let hash = core.host().location().hash;
	let location = core.location(&hash, None);
	if path::is_absolute(hash.trim()) {
		core.navigate(location, NavigateOptions::new(), HostWrite::None)?;
		return Ok(());
	}
	let canonical = location.to_string();
	if !core.navigate(location, NavigateOptions::new(), HostWrite::ReplaceHash)? {
		core.host().replace_hash(&canonical);
	}
	Ok(())
}

impl NavigationController for HashController {
	fn name(&self) -> &'static str {
		"hash"
	}

	fn init(&self, config: &RouterConfig, apply: Arc<dyn ApplyNavigation>) -> RouterResult<()> {
		self.core.activate(config, apply);
		let weak = Arc::downgrade(&self.core);
		let id = self.core.host().subscribe(Arc::new(move |event: &HostEvent| {
			if let (HostEvent::HashChange, Some(core)) = (event, weak.upgrade())
				&& let Err(error) = monitor(&core)
			{
				tracing::warn!(error = %error, "fragment navigation failed");
			}
			EventOutcome::Continue
		}));
		self.core.set_listener(id);
		monitor(&self.core)
	}

	fn redirect(&self, url: &str, query: Option<&Query>, options: NavigateOptions) -> RouterResult<()> {
		self.core.apply_handle()?;
		let location = self.core.location(url, query);
		if options.silent {
			tracing::debug!(url = %location, "silent redirect recorded");
			self.core.record(location);
			return Ok(());
		}
		self.core.navigate(location, options, HostWrite::SetHash)?;
		Ok(())
	}

	fn reset(&self, url: &str, query: Option<&Query>, options: NavigateOptions) -> RouterResult<()> {
		self.core.apply_handle()?;
		let location = self.core.location(url, query);
		let hash = location.to_string();
		if options.silent {
			self.core.record(location);
		} else if self.core.navigate(location, options, HostWrite::ReplaceHash)? {
			return Ok(());
		}
		self.core.host().replace_hash(&hash);
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
