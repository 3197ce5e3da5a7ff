//! # waypost-router
//!
//! Client-side navigation routing: a route table mapping path patterns to
//! handlers, a dispatcher that runs one navigation at a time, and controllers
//! that keep the current location in sync with a navigation host.
//!
//! ## Route patterns
//!
//! | Pattern | Matches |
//! |---|---|
//! | `""` | anything, when nothing else does |
//! | `"/docs/"` | the path itself (directory paths compared with the index file) |
//! | `"/item/:id/page/:page"` | one path segment per `:name`, captured by name |
//! | `Regex` | any path the expression matches, with numbered captures |
//!
//! Rules are tried in registration order and the first match wins.
//!
//! ## Controllers
//!
//! - [`controller::HashController`] keeps the location in the fragment.
//! - [`controller::HistoryController`] drives the host history stack.
//! - [`controller::ReloadController`] reloads the page on every redirect.
//!
//! Hosts implement [`host::NavigationHost`]; [`host::MemoryHistory`] is an
//! in-process host for tests and headless use.

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod host;
pub mod options;
pub mod pattern;
pub mod router;
pub mod table;

pub use config::{ConfigUpdate, RouterConfig};
pub use controller::NavigationController;
pub use dispatcher::{ApplyNavigation, Dispatch, Dispatcher, Finish, NavigationEffects};
pub use error::{RouterError, RouterResult};
pub use handler::{RouteHandler, RouteRequest, async_handler, sync_handler, try_handler};
pub use options::NavigateOptions;
pub use pattern::{IntoPattern, RoutePattern};
pub use router::Router;
pub use table::{RouteMatch, RouteRule, RouteTable};
