//! Integration test utilities for Waypost
//!
//! Shared fixtures for the cross-crate navigation scenarios: a recorder for
//! handler invocations and routers wired to an in-memory host.

use parking_lot::Mutex;
use std::sync::Arc;
use waypost_router::host::MemoryHistory;
use waypost_router::{Finish, RouteRequest, Router};
use waypost_url::QueryMap;

/// One recorded handler invocation.
#[derive(Debug, Clone)]
pub struct Call {
	pub tag: String,
	pub path: String,
	pub url: String,
	pub params: QueryMap,
}

/// Records handler invocations in order.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
	calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
	pub fn new() -> Self {
		Self::default()
	}

	/// A plain handler that records under `tag`.
	pub fn handler(&self, tag: &str) -> impl Fn(&RouteRequest) + Send + Sync + 'static {
		let log = self.clone();
		let tag = tag.to_string();
		move |req| log.record(&tag, req)
	}

	/// An async handler that records under `tag` and parks its completion
	/// token in `slot`.
	pub fn async_handler(
		&self,
		tag: &str,
		slot: FinishSlot,
	) -> impl Fn(&RouteRequest, Finish) + Send + Sync + 'static {
		let log = self.clone();
		let tag = tag.to_string();
		move |req, finish| {
			log.record(&tag, req);
			slot.park(finish);
		}
	}

	pub fn record(&self, tag: &str, req: &RouteRequest) {
		self.calls.lock().push(Call {
			tag: tag.to_string(),
			path: req.path.clone(),
			url: req.url.clone(),
			params: req.params.clone(),
		});
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().clone()
	}

	/// Urls of every call, in order.
	pub fn urls(&self) -> Vec<String> {
		self.calls.lock().iter().map(|c| c.url.clone()).collect()
	}

	/// Tags of every call, in order.
	pub fn tags(&self) -> Vec<String> {
		self.calls.lock().iter().map(|c| c.tag.clone()).collect()
	}

	pub fn len(&self) -> usize {
		self.calls.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.calls.lock().is_empty()
	}

	pub fn last(&self) -> Option<Call> {
		self.calls.lock().last().cloned()
	}
}

/// Holds the completion token of the async handler currently running.
#[derive(Debug, Clone, Default)]
pub struct FinishSlot {
	finish: Arc<Mutex<Option<Finish>>>,
}

impl FinishSlot {
	pub fn new() -> Self {
		Self::default()
	}

	fn park(&self, finish: Finish) {
		*self.finish.lock() = Some(finish);
	}

	/// Takes the parked token, if any.
	pub fn take(&self) -> Option<Finish> {
		self.finish.lock().take()
	}

	pub fn is_parked(&self) -> bool {
		self.finish.lock().is_some()
	}
}

/// A router using the history-stack controller over a fresh in-memory host.
pub fn history_router(href: &str) -> (Arc<MemoryHistory>, Router) {
	let host = MemoryHistory::shared(href);
	let router = Router::history(host.clone());
	(host, router)
}

/// A router using the fragment controller over a fresh in-memory host.
pub fn hash_router(href: &str) -> (Arc<MemoryHistory>, Router) {
	let host = MemoryHistory::shared(href);
	let router = Router::hash(host.clone());
	(host, router)
}

/// A router using the full-reload controller over a fresh in-memory host.
pub fn reload_router(href: &str) -> (Arc<MemoryHistory>, Router) {
	let host = MemoryHistory::shared(href);
	let router = Router::reload(host.clone());
	(host, router)
}
