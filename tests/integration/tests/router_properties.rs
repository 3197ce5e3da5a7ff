//! Routing properties that hold regardless of the controller in use.

use proptest::prelude::*;
use regex::Regex;
use rstest::rstest;
use waypost::prelude::*;
use waypost_integration_tests::{CallLog, history_router};

#[rstest]
fn test_each_distinct_location_dispatches_once() {
	// Arrange
	let (_host, router) = history_router("/");
	let log = CallLog::new();
	router.add("/", log.handler("root")).unwrap();
	router.add("/a", log.handler("a")).unwrap();
	router.start().unwrap();

	// Act
	router.redirect("/a", None, NavigateOptions::new()).unwrap();
	router.redirect("/a", None, NavigateOptions::new()).unwrap();
	router.redirect("/a?k=v", None, NavigateOptions::new()).unwrap();
	router.redirect("/a?k=v", None, NavigateOptions::new()).unwrap();
	router.redirect("/a?k=v", None, NavigateOptions::new().force()).unwrap();

	// Assert
	assert_eq!(log.urls(), vec!["/", "/a", "/a?k=v", "/a?k=v"]);
}

#[rstest]
fn test_query_order_does_not_matter() {
	// Arrange
	let (_host, router) = history_router("/");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	router.redirect("/x?kw=w&t=10", None, NavigateOptions::new()).unwrap();
	router.redirect("/x?t=10&kw=w", None, NavigateOptions::new()).unwrap();

	// Assert
	assert_eq!(log.urls(), vec!["/", "/x?kw=w&t=10"]);
}

#[rstest]
fn test_template_params_merge_with_query() {
	// Arrange
	let (_host, router) = history_router("/");
	let log = CallLog::new();
	router.add("/", log.handler("root")).unwrap();
	router
		.add("/item/:id/comments/:page/re", log.handler("comments"))
		.unwrap();
	router.start().unwrap();

	// Act
	router
		.redirect("/item/100/comments/2/re?name=saber", None, NavigateOptions::new())
		.unwrap();

	// Assert
	let call = log.last().unwrap();
	assert_eq!(call.tag, "comments");
	assert_eq!(call.params.len(), 3);
	assert_eq!(call.params["id"], QueryValue::Single("100".to_string()));
	assert_eq!(call.params["page"], QueryValue::Single("2".to_string()));
	assert_eq!(call.params["name"], QueryValue::Single("saber".to_string()));
}

#[rstest]
fn test_query_overrides_path_capture() {
	// Arrange
	let (_host, router) = history_router("/");
	let log = CallLog::new();
	router.add("/", log.handler("root")).unwrap();
	router.add("/item/:id", log.handler("item")).unwrap();
	router.start().unwrap();

	// Act
	router
		.redirect("/item/100", Some(&Query::parse("id=7")), NavigateOptions::new())
		.unwrap();

	// Assert
	assert_eq!(
		log.last().unwrap().params["id"],
		QueryValue::Single("7".to_string())
	);
}

#[rstest]
fn test_first_registered_regex_wins() {
	// Arrange
	let (_host, router) = history_router("/");
	let log = CallLog::new();
	router.add("/", log.handler("root")).unwrap();
	router.add(Regex::new(r"^/work/(\d+)").unwrap(), log.handler("first")).unwrap();
	router.add(Regex::new(r"/(\d+)$").unwrap(), log.handler("second")).unwrap();
	router.start().unwrap();

	// Act
	router.redirect("/work/12", None, NavigateOptions::new()).unwrap();

	// Assert
	let call = log.last().unwrap();
	assert_eq!(log.tags(), vec!["root", "first"]);
	assert_eq!(call.params["$1"], QueryValue::Single("12".to_string()));
}

#[rstest]
fn test_duplicate_route_is_rejected() {
	// Arrange
	let (_host, router) = history_router("/");
	let log = CallLog::new();
	router.add("/", log.handler("h")).unwrap();

	// Act
	let result = router.add("/", log.handler("h2"));
	router.start().unwrap();

	// Assert
	assert!(matches!(result, Err(RouterError::DuplicateRoute(ref p)) if p == "/"));
	assert_eq!(router.dispatcher().len(), 1);
	assert_eq!(log.tags(), vec!["h"]);
}

#[rstest]
fn test_missing_route_invokes_nothing() {
	// Arrange
	let (host, router) = history_router("/");
	let log = CallLog::new();
	router.add("/", log.handler("root")).unwrap();
	router.start().unwrap();

	// Act
	let result = router.redirect("/missing", None, NavigateOptions::new());

	// Assert
	assert!(matches!(result, Err(RouterError::RouteNotFound(_))));
	assert_eq!(log.len(), 1);
	assert_eq!(router.current().unwrap().path(), "/");
	assert_eq!(host.len(), 1);
}

#[rstest]
#[case("/a/b/c", "../d", "/a/d")]
#[case("/work/list", "./../index", "/index")]
#[case("/a/b/", "c", "/a/b/c")]
#[case("/a/b", "?page=2", "/a/b?page=2")]
#[case("/a/b", "../../../..", "/")]
fn test_relative_redirect_resolves_against_current(
	#[case] start: &str,
	#[case] target: &str,
	#[case] expected: &str,
) {
	// Arrange
	let (_host, router) = history_router(start);
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	router.redirect(target, None, NavigateOptions::new()).unwrap();

	// Assert
	let expected = Location::parse(expected, &ParseOptions::new());
	assert!(router.current().unwrap().equal(&expected));
}

#[rstest]
fn test_index_makes_directory_equal_to_index_file() {
	// Arrange
	let (_host, router) = history_router("/docs/");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start_with(ConfigUpdate::new().index("index")).unwrap();

	// Act
	router.redirect("/docs/index", None, NavigateOptions::new()).unwrap();

	// Assert
	assert_eq!(log.len(), 1);
}

#[rstest]
fn test_removed_route_falls_back() {
	// Arrange
	let (_host, router) = history_router("/");
	let log = CallLog::new();
	router.fallback(log.handler("fallback")).unwrap();
	router.add("/a", log.handler("a")).unwrap();
	router.start().unwrap();

	// Act
	assert!(router.remove("/a").unwrap());
	assert!(!router.remove("/a").unwrap());
	router.redirect("/a", None, NavigateOptions::new()).unwrap();

	// Assert
	assert_eq!(log.tags(), vec!["fallback", "fallback"]);
}

#[rstest]
fn test_fallible_handler_error_reaches_caller() {
	// Arrange
	let (_host, router) = history_router("/");
	router.add("/", |_| {}).unwrap();
	router
		.add_fallible("/broken", |_| Err(RouterError::InvalidConfig("boom".to_string())))
		.unwrap();
	router.start().unwrap();

	// Act
	let result = router.redirect("/broken", None, NavigateOptions::new());

	// Assert
	assert!(matches!(result, Err(RouterError::InvalidConfig(_))));
	assert!(!router.dispatcher().is_busy());
}

fn segment() -> impl Strategy<Value = String> {
	"[a-z0-9]{1,6}"
}

fn location() -> impl Strategy<Value = Location> {
	(
		prop::collection::vec(segment(), 0..4),
		prop::collection::vec((segment(), "[a-zA-Z0-9 &=%/]{0,8}"), 0..4),
	)
		.prop_map(|(segments, pairs)| {
			let mut location = Location::parse(&format!("/{}", segments.join("/")), &ParseOptions::new());
			for (key, value) in pairs {
				location.add_query(&key, &value);
			}
			location
		})
}

proptest! {
	#[test]
	fn test_redirect_to_serialized_current_is_skipped(target in location()) {
		let (_host, router) = history_router("/");
		let log = CallLog::new();
		router.fallback(log.handler("any")).unwrap();
		router.start().unwrap();

		router.redirect(&target.to_string(), None, NavigateOptions::new()).unwrap();
		let dispatched = log.len();
		let current = router.current().unwrap();
		router.redirect(&current.to_string(), None, NavigateOptions::new()).unwrap();

		prop_assert!(current.equal(&target));
		prop_assert_eq!(log.len(), dispatched);
	}
}
