//! # Waypost
//!
//! A client-side navigation router. It maps the current location to handlers
//! and keeps that location in sync with a navigation host, through the
//! fragment, the history stack or full page loads.
//!
//! ## Feature Flags
//!
//! - `router` (default) - Route table, dispatcher, controllers and the
//!   [`Router`] façade. Without it only the location model is available.
//!
//! ## Quick Example
//!
//! ```rust
//! use waypost::prelude::*;
//! use waypost::router::host::MemoryHistory;
//!
//! let host = MemoryHistory::shared("/#/");
//! let router = Router::hash(host.clone());
//!
//! router.add("/", |_| {}).unwrap();
//! router.add("/user/:id", |req| {
//!     println!("user {:?}", req.params["id"].first());
//! }).unwrap();
//!
//! router.start().unwrap();
//! router.redirect("user/42", None, NavigateOptions::new()).unwrap();
//!
//! assert_eq!(router.current().unwrap().path(), "/user/42");
//! ```

pub mod url;

#[cfg(feature = "router")]
pub mod router;

pub use waypost_url::{Location, ParseOptions, Query, QueryValue};

#[cfg(feature = "router")]
pub use waypost_router::{
	ConfigUpdate, NavigateOptions, RouteHandler, RouteRequest, Router, RouterConfig, RouterError,
	RouterResult,
};

/// Common imports.
pub mod prelude {
	pub use crate::{Location, ParseOptions, Query, QueryValue};

	#[cfg(feature = "router")]
	pub use crate::{
		ConfigUpdate, NavigateOptions, RouteHandler, RouteRequest, Router, RouterConfig, RouterError,
		RouterResult,
	};
}
