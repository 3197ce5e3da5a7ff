//! A browser-like history stack kept in memory.

use super::{
	EventOutcome, HostEvent, HostListener, HostLocation, LinkActivation, ListenerId, NavigationHost,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Default)]
struct Entry {
	location: HostLocation,
	state: Option<String>,
}

#[derive(Debug)]
struct Stack {
	entries: Vec<Entry>,
	index: usize,
	title: String,
	loads: Vec<String>,
}

impl Stack {
	fn current(&self) -> &Entry {
		&self.entries[self.index]
	}

	fn push(&mut self, entry: Entry) {
		self.entries.truncate(self.index + 1);
		self.entries.push(entry);
		self.index = self.entries.len() - 1;
	}

	fn replace(&mut self, entry: Entry) {
		self.entries[self.index] = entry;
	}
}

/// In-memory [`NavigationHost`].
///
/// Events are delivered synchronously, after internal locks are released, so
/// listeners may call back into the host.
///
/// ```
/// use waypost_router::host::{MemoryHistory, NavigationHost};
///
/// let history = MemoryHistory::new("/a");
/// history.push_state("/b?x=1", None);
/// history.set_hash("top");
///
/// assert_eq!(history.location().href(), "/b?x=1#top");
/// assert!(history.back());
/// assert_eq!(history.location().href(), "/b?x=1");
/// ```
pub struct MemoryHistory {
	stack: Mutex<Stack>,
	listeners: Mutex<Vec<(ListenerId, HostListener)>>,
	next_id: AtomicU64,
}

impl MemoryHistory {
	/// Creates a history with a single entry at `href`.
	pub fn new(href: &str) -> Self {
		Self {
			stack: Mutex::new(Stack {
				entries: vec![Entry {
					location: HostLocation::parse(href),
					state: None,
				}],
				index: 0,
				title: String::new(),
				loads: Vec::new(),
			}),
			listeners: Mutex::new(Vec::new()),
			next_id: AtomicU64::new(1),
		}
	}

	/// Creates a shareable history.
	pub fn shared(href: &str) -> Arc<Self> {
		Arc::new(Self::new(href))
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.stack.lock().entries.len()
	}

	/// Always `false`; a history has at least one entry.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Returns the index of the current entry.
	pub fn index(&self) -> usize {
		self.stack.lock().index
	}

	/// Returns every entry's href, oldest first.
	pub fn hrefs(&self) -> Vec<String> {
		self.stack
			.lock()
			.entries
			.iter()
			.map(|entry| entry.location.href())
			.collect()
	}

	/// Returns the hrefs passed to [`NavigationHost::assign`], in order.
	pub fn loads(&self) -> Vec<String> {
		self.stack.lock().loads.clone()
	}

	/// Returns the number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.lock().len()
	}

	/// Moves one entry back. Returns `false` at the oldest entry.
	pub fn back(&self) -> bool {
		self.go(-1)
	}

	/// Moves one entry forward. Returns `false` at the newest entry.
	pub fn forward(&self) -> bool {
		self.go(1)
	}

	/// Moves `delta` entries, firing `PopState` and, when the fragment
	/// differs, `HashChange`. Out-of-range moves do nothing.
	pub fn go(&self, delta: isize) -> bool {
		let (state, hash_changed) = {
			let mut stack = self.stack.lock();
			let Some(target) = stack.index.checked_add_signed(delta) else {
				return false;
			};
			if delta == 0 || target >= stack.entries.len() {
				return false;
			}
			let previous_hash = stack.current().location.hash.clone();
			stack.index = target;
			let entry = stack.current();
			(entry.state.clone(), entry.location.hash != previous_hash)
		};
		self.emit(&HostEvent::PopState { state });
		if hash_changed {
			self.emit(&HostEvent::HashChange);
		}
		true
	}

	/// Delivers a link activation. Returns whether a listener prevented the
	/// default action; if none did, the host follows the link itself.
	pub fn activate_link(&self, link: LinkActivation) -> bool {
		let href = link.href.clone();
		let prevented = self.emit(&HostEvent::LinkActivated(link)) == EventOutcome::PreventDefault;
		if !prevented && !href.is_empty() {
			match href.strip_prefix('#') {
				Some(hash) => self.set_hash(hash),
				None => self.assign(&href),
			}
		}
		prevented
	}

	fn emit(&self, event: &HostEvent) -> EventOutcome {
		let listeners: Vec<HostListener> = self
			.listeners
			.lock()
			.iter()
			.map(|(_, listener)| Arc::clone(listener))
			.collect();
		let mut outcome = EventOutcome::Continue;
		for listener in listeners {
			if listener(event) == EventOutcome::PreventDefault {
				outcome = EventOutcome::PreventDefault;
			}
		}
		outcome
	}

	fn entry_for(&self, url: &str, state: Option<String>) -> Entry {
		Entry {
			location: HostLocation::parse(url),
			state,
		}
	}
}

impl NavigationHost for MemoryHistory {
	fn location(&self) -> HostLocation {
		self.stack.lock().current().location.clone()
	}

	fn state(&self) -> Option<String> {
		self.stack.lock().current().state.clone()
	}

	fn title(&self) -> String {
		self.stack.lock().title.clone()
	}

	fn push_state(&self, url: &str, state: Option<String>) {
		let entry = self.entry_for(url, state);
		self.stack.lock().push(entry);
	}

	fn replace_state(&self, url: &str, state: Option<String>) {
		let entry = self.entry_for(url, state);
		self.stack.lock().replace(entry);
	}

	fn set_hash(&self, hash: &str) {
		let changed = {
			let mut stack = self.stack.lock();
			let current = stack.current().location.clone();
			if current.hash == hash {
				false
			} else {
				stack.push(Entry {
					location: HostLocation {
						hash: hash.to_string(),
						..current
					},
					state: None,
				});
				true
			}
		};
		if changed {
			self.emit(&HostEvent::HashChange);
		}
	}

	fn replace_hash(&self, hash: &str) {
		let changed = {
			let mut stack = self.stack.lock();
			let current = stack.current().location.clone();
			let changed = current.hash != hash;
			stack.replace(Entry {
				location: HostLocation {
					hash: hash.to_string(),
					..current
				},
				state: None,
			});
			changed
		};
		if changed {
			self.emit(&HostEvent::HashChange);
		}
	}

	fn assign(&self, href: &str) {
		let entry = self.entry_for(href, None);
		let mut stack = self.stack.lock();
		stack.push(entry);
		stack.loads.push(href.to_string());
	}

	fn set_title(&self, title: &str) {
		self.stack.lock().title = title.to_string();
	}

	fn subscribe(&self, listener: HostListener) -> ListenerId {
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.listeners.lock().push((id, listener));
		id
	}

	fn unsubscribe(&self, id: ListenerId) {
		self.listeners.lock().retain(|(listener_id, _)| *listener_id != id);
	}
}

impl std::fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryHistory")
			.field("stack", &*self.stack.lock())
			.field("listeners", &self.listener_count())
			.finish()
	}
}
