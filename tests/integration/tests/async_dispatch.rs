//! Navigations issued while an async handler is still running.

use rstest::{fixture, rstest};
use waypost::prelude::*;
use waypost_integration_tests::{CallLog, FinishSlot, history_router};
use waypost_router::Dispatch;
use waypost_router::host::{MemoryHistory, NavigationHost};

struct Fixture {
	host: std::sync::Arc<MemoryHistory>,
	router: Router,
	log: CallLog,
	slot: FinishSlot,
}

#[fixture]
fn started() -> Fixture {
	let (host, router) = history_router("/");
	let log = CallLog::new();
	let slot = FinishSlot::new();
	router.add("/", log.handler("root")).unwrap();
	router
		.add_async(regex::Regex::new("^/load/").unwrap(), log.async_handler("load", slot.clone()))
		.unwrap();
	router.start().unwrap();
	Fixture {
		host,
		router,
		log,
		slot,
	}
}

#[rstest]
fn test_router_stays_busy_until_finish(started: Fixture) {
	// Act
	started
		.router
		.redirect("/load/1", None, NavigateOptions::new())
		.unwrap();

	// Assert
	assert!(started.router.dispatcher().is_busy());
	assert!(started.slot.is_parked());

	let result = started.slot.take().unwrap().done().unwrap();
	assert_eq!(result, Dispatch::Completed);
	assert!(!started.router.dispatcher().is_busy());
}

#[rstest]
fn test_only_last_navigation_while_busy_is_replayed(started: Fixture) {
	// Arrange
	started
		.router
		.redirect("/load/1", None, NavigateOptions::new())
		.unwrap();

	// Act
	started
		.router
		.redirect("/load/2", None, NavigateOptions::new())
		.unwrap();
	started
		.router
		.redirect("/load/3", None, NavigateOptions::new())
		.unwrap();
	let replay = started.slot.take().unwrap().done().unwrap();

	// Assert
	assert_eq!(replay, Dispatch::InFlight);
	assert_eq!(started.log.urls(), vec!["/", "/load/1", "/load/3"]);
	assert_eq!(started.host.location().pathname, "/load/3");
	assert!(!started.router.dispatcher().has_pending());

	started.slot.take().unwrap().done().unwrap();
	assert!(!started.router.dispatcher().is_busy());
}

#[rstest]
fn test_sync_route_queued_behind_async(started: Fixture) {
	// Arrange
	started
		.router
		.redirect("/load/1", None, NavigateOptions::new())
		.unwrap();
	started.router.redirect("/", None, NavigateOptions::new()).unwrap();

	// Act
	let replay = started.slot.take().unwrap().done().unwrap();

	// Assert
	assert_eq!(replay, Dispatch::Completed);
	assert_eq!(started.log.tags(), vec!["root", "load", "root"]);
}

#[rstest]
fn test_stop_invalidates_outstanding_finish(started: Fixture) {
	// Arrange
	started
		.router
		.redirect("/load/1", None, NavigateOptions::new())
		.unwrap();
	started
		.router
		.redirect("/load/2", None, NavigateOptions::new())
		.unwrap();

	// Act
	started.router.stop();
	let result = started.slot.take().unwrap().done().unwrap();

	// Assert
	assert_eq!(result, Dispatch::Completed);
	assert_eq!(started.log.urls(), vec!["/", "/load/1"]);
	assert!(!started.router.dispatcher().has_pending());
}
