// In: src/layout/mod.rs

//! Layouts that position an already-built graph.
//!
//! Only the time-ring layout lives here: `planner` turns a timestamp column
//! into a `TimeAxisPlan`, and `ring` maps nodes and axis boundaries onto
//! radii using that plan.

pub mod planner;
pub mod ring;

pub use planner::{find_round_bin_width, plan_time_axis, round_to_nearest, TimeAxisPlan};
pub use ring::{gen_axis, pretty_print_time, time_ring};

use serde::{Deserialize, Serialize};

/// One ring boundary of the radial axis.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub label: String,
    pub r: f64,
    /// Rendered inside the plot area.
    pub internal: bool,
}

#[cfg(test)]
mod ring_tests;
