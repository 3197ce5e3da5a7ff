//! # waypost-url
//!
//! The location value model used by the waypost navigation router.
//!
//! A [`Location`] is a parsed `(path, query, fragment)` triple. Parsing always
//! produces an absolute path: relative input is resolved against a base
//! location (or `/`), with `..` and `.` folded the same way a browser resolves
//! relative links.
//!
//! ## Example
//!
//! ```
//! use waypost_url::{Location, ParseOptions};
//!
//! let current = Location::parse("/a/b/c", &ParseOptions::new());
//! let next = Location::parse("../d?kw=w&t=10", &ParseOptions::new().base(&current));
//!
//! assert_eq!(next.path(), "/a/d");
//! assert_eq!(next.to_string(), "/a/d?kw=w&t=10");
//! assert!(next.equal(&Location::parse("/a/d?t=10&kw=w", &ParseOptions::new())));
//! ```

pub mod location;
pub mod path;
pub mod query;

pub use location::{DEFAULT_TOKEN, Location, ParseOptions};
pub use query::{Query, QueryMap, QueryValue};
