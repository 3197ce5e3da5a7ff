//! Fragment-based navigation scenarios.

use rstest::rstest;
use waypost::prelude::*;
use waypost_integration_tests::{CallLog, hash_router};
use waypost_router::host::NavigationHost;

#[rstest]
fn test_start_dispatches_fragment() {
	// Arrange
	let (_host, router) = hash_router("/index.html#/user/42~tab=posts");
	let log = CallLog::new();
	router.add("/user/:id", log.handler("user")).unwrap();

	// Act
	router.start().unwrap();

	// Assert
	let call = log.last().unwrap();
	assert_eq!(call.path, "/user/42");
	assert_eq!(call.params["id"], QueryValue::Single("42".to_string()));
	assert_eq!(call.params["tab"], QueryValue::Single("posts".to_string()));
}

#[rstest]
fn test_redirects_build_browsable_history() {
	// Arrange
	let (host, router) = hash_router("/#/");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	router.redirect("/a", None, NavigateOptions::new()).unwrap();
	router.redirect("b", None, NavigateOptions::new()).unwrap();
	host.back();
	host.back();
	host.forward();

	// Assert
	assert_eq!(log.urls(), vec!["/", "/a", "/b", "/a", "/", "/a"]);
	assert_eq!(router.current().unwrap().path(), "/a");
}

#[rstest]
fn test_user_typed_fragment_dispatches() {
	// Arrange
	let (host, router) = hash_router("/#/");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	host.set_hash("/search~q=rust");

	// Assert
	assert_eq!(log.urls(), vec!["/", "/search~q=rust"]);
}

#[rstest]
fn test_relative_fragment_leaves_canonical_entry() {
	// Arrange
	let (host, router) = hash_router("/#/a/b");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	host.set_hash("c");
	host.back();

	// Assert
	assert_eq!(host.location().hash, "/a/b");
	assert_eq!(log.urls(), vec!["/a/b", "/a/c", "/a/b"]);
}

#[rstest]
fn test_relative_fragment_to_current_page_shows_it_twice() {
	// Arrange
	let (host, router) = hash_router("/#/a/b");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	host.set_hash("./b");
	host.back();

	// Assert
	assert_eq!(host.hrefs(), vec!["/#/a/b", "/#/a/b"]);
	assert_eq!(log.urls(), vec!["/a/b"]);
	assert_eq!(host.location().hash, "/a/b");
}

#[rstest]
fn test_title_option_reaches_host() {
	// Arrange
	let (host, router) = hash_router("/#/");
	router.fallback(|_| {}).unwrap();
	router.start().unwrap();

	// Act
	router
		.redirect("/about", None, NavigateOptions::new().title("About us"))
		.unwrap();

	// Assert
	assert_eq!(host.title(), "About us");
	assert_eq!(router.dispatcher().title().as_deref(), Some("About us"));
}

#[rstest]
fn test_nested_redirect_from_handler() {
	// Arrange
	let (host, router) = hash_router("/#/");
	let log = CallLog::new();
	let router = std::sync::Arc::new(router);
	router.add("/", log.handler("root")).unwrap();
	router.add("/login", log.handler("login")).unwrap();
	let weak = std::sync::Arc::downgrade(&router);
	router
		.add("/private", move |_| {
			if let Some(router) = weak.upgrade() {
				router.redirect("login", None, NavigateOptions::new()).unwrap();
			}
		})
		.unwrap();
	router.start().unwrap();

	// Act
	router.redirect("/private", None, NavigateOptions::new()).unwrap();

	// Assert
	assert_eq!(log.tags(), vec!["root", "login"]);
	assert_eq!(router.current().unwrap().path(), "/login");
	assert_eq!(host.location().hash, "/login");
}
