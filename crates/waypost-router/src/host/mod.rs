//! The navigation host: the environment whose history the controllers keep in
//! sync.
//!
//! Controllers only talk to a [`NavigationHost`]. [`MemoryHistory`] is the
//! in-process implementation used by applications without a browser and by
//! the test suites.

mod memory;

pub use memory::MemoryHistory;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::RouterResult;
use crate::options::NavigateOptions;
use waypost_url::Location;

/// The host's current location, split the way browsers expose it.
///
/// `search` and `hash` are stored without their leading `?` and `#`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostLocation {
	/// Path component.
	pub pathname: String,
	/// Query string, without `?`.
	pub search: String,
	/// Fragment, without `#`.
	pub hash: String,
}

impl HostLocation {
	/// Splits an `path?search#hash` string.
	pub fn parse(href: &str) -> Self {
		let (rest, hash) = href.split_once('#').unwrap_or((href, ""));
		let (pathname, search) = rest.split_once('?').unwrap_or((rest, ""));
		Self {
			pathname: pathname.to_string(),
			search: search.to_string(),
			hash: hash.to_string(),
		}
	}

	/// Joins path and query, omitting an empty query.
	pub fn path_and_search(&self) -> String {
		if self.search.is_empty() {
			self.pathname.clone()
		} else {
			format!("{}?{}", self.pathname, self.search)
		}
	}

	/// Joins all three parts, omitting empty query and fragment.
	pub fn href(&self) -> String {
		let mut href = self.path_and_search();
		if !self.hash.is_empty() {
			href.push('#');
			href.push_str(&self.hash);
		}
		href
	}
}

/// An activated link, as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkActivation {
	/// Raw `href` attribute.
	pub href: String,
	/// Raw `target` attribute.
	pub target: Option<String>,
	/// Mouse button; `0` is the primary button.
	pub button: u16,
	/// Ctrl key held.
	pub ctrl: bool,
	/// Meta key held.
	pub meta: bool,
	/// Shift key held.
	pub shift: bool,
}

impl LinkActivation {
	/// A plain primary-button activation of `href`.
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: href.into(),
			..Self::default()
		}
	}

	/// Sets the `target` attribute.
	pub fn target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	/// Whether the activation asks for a new tab or window.
	pub fn opens_elsewhere(&self) -> bool {
		self.button != 0
			|| self.ctrl
			|| self.meta
			|| self.shift
			|| self.target.as_deref().is_some_and(|t| !t.is_empty() && t != "_self")
	}

	/// Returns the in-app href this activation should be routed to, if any.
	///
	/// Empty hrefs, fragment links, hrefs with a scheme or a protocol-relative
	/// authority (`//host/path`) and activations that open elsewhere are left
	/// to the host.
	pub fn in_app_href(&self) -> Option<&str> {
		let href = self.href.as_str();
		let routable = !href.is_empty()
			&& !href.starts_with('#')
			&& !href.starts_with("//")
			&& !href.contains(':');
		(routable && !self.opens_elsewhere()).then_some(href)
	}
}

/// Events delivered to host listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	/// The fragment changed.
	HashChange,
	/// The active history entry changed by traversal.
	PopState {
		/// State payload stored with the entry.
		state: Option<String>,
	},
	/// A link was activated.
	LinkActivated(LinkActivation),
}

/// A listener's verdict on the host's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
	/// Let the host proceed.
	Continue,
	/// Cancel the host's default action.
	PreventDefault,
}

/// Identifies a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// A host event listener.
pub type HostListener = Arc<dyn Fn(&HostEvent) -> EventOutcome + Send + Sync>;

/// The environment's navigation history.
pub trait NavigationHost: Send + Sync {
	/// Returns the current location.
	fn location(&self) -> HostLocation;

	/// Returns the state payload of the current entry.
	fn state(&self) -> Option<String>;

	/// Returns the document title.
	fn title(&self) -> String;

	/// Pushes a new entry. Fires no event.
	fn push_state(&self, url: &str, state: Option<String>);

	/// Replaces the current entry. Fires no event.
	fn replace_state(&self, url: &str, state: Option<String>);

	/// Navigates to a new fragment, creating an entry when it differs.
	fn set_hash(&self, hash: &str);

	/// Replaces the current entry's fragment.
	fn replace_hash(&self, hash: &str);

	/// Full top-level navigation. Nothing runs after it on a real host.
	fn assign(&self, href: &str);

	/// Sets the document title.
	fn set_title(&self, title: &str);

	/// Registers a listener.
	fn subscribe(&self, listener: HostListener) -> ListenerId;

	/// Removes a listener. Unknown ids are ignored.
	fn unsubscribe(&self, id: ListenerId);
}

/// The payload stored with each history entry by the history controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
	/// Serialized location.
	pub url: String,
	/// Options of the navigation that created the entry.
	#[serde(default)]
	pub options: NavigateOptions,
}

impl HistoryState {
	/// Captures a navigation.
	pub fn new(location: &Location, options: &NavigateOptions) -> Self {
		Self {
			url: location.to_string(),
			options: options.clone().without_flags(),
		}
	}

	/// Encodes as JSON.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::HistoryState`] if encoding fails.
	pub fn to_json(&self) -> RouterResult<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Decodes from JSON.
	///
	/// # Errors
	///
	/// Returns [`crate::RouterError::HistoryState`] for malformed payloads.
	pub fn from_json(raw: &str) -> RouterResult<Self> {
		Ok(serde_json::from_str(raw)?)
	}
}
