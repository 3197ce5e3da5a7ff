//! History-stack navigation scenarios.

use rstest::rstest;
use waypost::prelude::*;
use waypost_integration_tests::{CallLog, history_router};
use waypost_router::controller::HashController;
use waypost_router::host::{HistoryState, LinkActivation, NavigationHost};

#[rstest]
fn test_link_activation_becomes_redirect() {
	// Arrange
	let (host, router) = history_router("/docs/intro");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	let prevented = host.activate_link(LinkActivation::new("setup?step=2"));

	// Assert
	assert!(prevented);
	assert_eq!(log.urls(), vec!["/docs/intro", "/docs/setup?step=2"]);
	assert_eq!(host.location().href(), "/docs/setup?step=2");
	assert!(host.loads().is_empty());
}

#[rstest]
#[case::external(LinkActivation::new("https://example.com/"))]
#[case::new_tab(LinkActivation::new("/docs").target("_blank"))]
#[case::modifier(LinkActivation { ctrl: true, ..LinkActivation::new("/docs") })]
#[case::middle_button(LinkActivation { button: 1, ..LinkActivation::new("/docs") })]
#[case::fragment(LinkActivation::new("#top"))]
#[case::protocol_relative(LinkActivation::new("//evil.example/phish"))]
fn test_links_left_to_host(#[case] link: LinkActivation) {
	// Arrange
	let (host, router) = history_router("/");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	let prevented = host.activate_link(link);

	// Assert
	assert!(!prevented);
	assert_eq!(log.len(), 1);
}

#[rstest]
fn test_root_from_toml_config() {
	// Arrange
	let config = RouterConfig::from_toml_str(
		r#"
		root = "/app"
		index = "index.html"
		"#,
	)
	.unwrap();
	let (host, router) = history_router("/app/");
	let log = CallLog::new();
	router.add("/index.html", log.handler("home")).unwrap();
	router.add("/list", log.handler("list")).unwrap();

	// Act
	router.start_with(config.into()).unwrap();
	router.redirect("list", None, NavigateOptions::new()).unwrap();

	// Assert
	assert_eq!(log.tags(), vec!["home", "list"]);
	assert_eq!(host.location().pathname, "/app/list");
	assert_eq!(router.settings().root, "/app");
}

#[rstest]
fn test_history_state_round_trips_through_host() {
	// Arrange
	let (host, router) = history_router("/");
	router.fallback(|_| {}).unwrap();
	router.start().unwrap();

	// Act
	router
		.redirect(
			"/report",
			Some(&Query::parse("year=2024")),
			NavigateOptions::new().title("Report").with("scroll", serde_json::json!(120)),
		)
		.unwrap();

	// Assert
	let state = HistoryState::from_json(&host.state().unwrap()).unwrap();
	assert_eq!(state.url, "/report?year=2024");
	assert_eq!(state.options.title.as_deref(), Some("Report"));
	assert_eq!(state.options.get("scroll"), Some(&serde_json::json!(120)));
	assert_eq!(host.title(), "Report");
}

#[rstest]
fn test_back_reapplies_stored_title() {
	// Arrange
	let (host, router) = history_router("/");
	router.fallback(|_| {}).unwrap();
	router.start().unwrap();
	router.redirect("/one", None, NavigateOptions::new().title("One")).unwrap();
	router.redirect("/two", None, NavigateOptions::new().title("Two")).unwrap();

	// Act
	host.back();

	// Assert
	assert_eq!(router.current().unwrap().path(), "/one");
	assert_eq!(host.title(), "One");
}

#[rstest]
fn test_reset_replaces_current_entry() {
	// Arrange
	let (host, router) = history_router("/");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();
	router.redirect("/draft", None, NavigateOptions::new()).unwrap();

	// Act
	router.reset("/final", None, NavigateOptions::new()).unwrap();

	// Assert
	assert_eq!(host.hrefs(), vec!["/", "/final"]);
	assert_eq!(log.urls(), vec!["/", "/draft", "/final"]);
}

#[rstest]
fn test_silent_redirect_only_moves_baseline() {
	// Arrange
	let (host, router) = history_router("/a/b");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	router.redirect("/x/y", None, NavigateOptions::new().silent()).unwrap();
	router.redirect("z", None, NavigateOptions::new()).unwrap();

	// Assert
	assert_eq!(log.urls(), vec!["/a/b", "/x/z"]);
	assert_eq!(host.hrefs(), vec!["/a/b", "/x/z"]);
}

#[rstest]
fn test_stop_detaches_from_host() {
	// Arrange
	let (host, router) = history_router("/");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();
	router.redirect("/a", None, NavigateOptions::new()).unwrap();

	// Act
	router.stop();
	host.back();

	// Assert
	assert_eq!(log.len(), 2);
	assert_eq!(host.listener_count(), 0);
	assert!(router.dispatcher().is_empty());
	assert!(router.current().is_none());
}

#[rstest]
fn test_swap_to_hash_controller() {
	// Arrange
	let (host, router) = history_router("/page#/inner");
	let log = CallLog::new();
	router.fallback(log.handler("any")).unwrap();
	router.start().unwrap();

	// Act
	router
		.set_controller(std::sync::Arc::new(HashController::new(host.clone())))
		.unwrap();
	router.redirect("/next", None, NavigateOptions::new()).unwrap();

	// Assert
	assert_eq!(log.urls(), vec!["/page#/inner", "/inner", "/next"]);
	assert_eq!(host.location().href(), "/page#/next");
}
