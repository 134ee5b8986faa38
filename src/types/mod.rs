//! This module defines the core, strongly-typed value representations shared
//! by the hypergraph builder and the ring layout.
//!
//! It currently includes:
//! - `EntityKey`, the single choke point for synthetic node identifiers.
//! - `TimeUnit` and `CalendarOffset`, the rounding units of the time-bin planner.

pub mod entity_key;
pub mod time_unit;

// Re-export the main type(s) for easier access.
pub use entity_key::EntityKey;
pub use time_unit::{CalendarOffset, TimeUnit};
