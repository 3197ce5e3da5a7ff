//! Location value model.
//!
//! Parsing, relative resolution, equality and serialization of
//! `(path, query, fragment)` locations.

// Re-export all waypost-url functionality
pub use waypost_url::*;
