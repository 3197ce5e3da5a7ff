//! Navigation routing.
//!
//! Route table, dispatcher, navigation hosts and the hash, history and reload
//! controllers.

// Re-export all waypost-router functionality
pub use waypost_router::*;
