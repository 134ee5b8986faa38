// In: src/config.rs

//! The single source of truth for all hyperframe call configuration.
//!
//! Two entry points consume configuration: the hypergraph builder
//! (`HyperConfig`) and the time-ring layout (`RingConfig`). Both are plain,
//! serde-deserializable structs so they can be created once at the
//! application boundary (a JSON document, a Python dict) and validated before
//! any table is touched. Unknown keys are rejected rather than ignored.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::HyperframeError;
use crate::layout::AxisLabel;
use crate::types::TimeUnit;

//==================================================================================
// I. Engine Selection
//==================================================================================

/// Selects the tabular engine that executes a call.
///
/// The choice is fixed for the entire call; builders never mix engines.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineKind {
    /// **Default:** whole-batch Arrow compute kernels.
    Eager,

    /// Row partitions are processed independently and concatenated. Keeps
    /// per-kernel working sets bounded on very tall tables.
    Partitioned {
        /// Number of rows per partition.
        #[serde(default = "default_partition_rows")]
        partition_rows: usize,
    },
}

// Implement `Default` manually for `EngineKind` because of the struct variant.
impl Default for EngineKind {
    fn default() -> Self {
        EngineKind::Eager
    }
}

/// Provides a sensible default for `partition_rows` for serde.
fn default_partition_rows() -> usize {
    65_536
}

//==================================================================================
// II. Hypergraph Configuration
//==================================================================================

/// Per-role name overrides and shaping options.
///
/// Keys are upper-case, matching the option dictionaries callers already write.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HyperOpts {
    #[serde(rename = "TITLE", default)]
    pub title: Option<String>,
    #[serde(rename = "DELIM", default)]
    pub delim: Option<String>,
    #[serde(rename = "NODEID", default)]
    pub node_id: Option<String>,
    #[serde(rename = "ATTRIBID", default)]
    pub attrib_id: Option<String>,
    #[serde(rename = "EVENTID", default)]
    pub event_id: Option<String>,
    #[serde(rename = "EVENTTYPE", default)]
    pub event_type: Option<String>,
    #[serde(rename = "SOURCE", default)]
    pub source: Option<String>,
    #[serde(rename = "DESTINATION", default)]
    pub destination: Option<String>,
    #[serde(rename = "CATEGORY", default)]
    pub category: Option<String>,
    #[serde(rename = "NODETYPE", default)]
    pub node_type: Option<String>,
    #[serde(rename = "EDGETYPE", default)]
    pub edge_type: Option<String>,
    #[serde(rename = "NULLVAL", default)]
    pub null_val: Option<String>,

    /// Columns that never become entities.
    #[serde(rename = "SKIP", default)]
    pub skip: Vec<String>,

    /// Category name -> member columns. Members share one entity namespace.
    #[serde(rename = "CATEGORIES", default)]
    pub categories: BTreeMap<String, Vec<String>>,

    /// Direct mode only: source column -> destination columns, in emission order.
    /// Keys iterate in sorted order.
    #[serde(rename = "EDGES", default)]
    pub edges: Option<BTreeMap<String, Vec<String>>>,
}

/// The full configuration of one `hypergraph` call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HyperConfig {
    /// Connect entities directly instead of through per-row event nodes.
    #[serde(default)]
    pub direct: bool,

    #[serde(default)]
    pub opts: HyperOpts,

    /// Keep only the key columns on edges.
    #[serde(default)]
    pub drop_edge_attrs: bool,

    /// Skip null cells: they produce no entity and no edge, but sibling cells
    /// of the same row are still processed.
    #[serde(default = "default_true")]
    pub drop_na: bool,

    /// Remove whole rows where any entity column is null before any derivation.
    #[serde(default)]
    pub drop_null_rows: bool,

    /// Emit per-call summaries at info level.
    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub engine: EngineKind,
}

impl Default for HyperConfig {
    fn default() -> Self {
        Self {
            direct: false,
            opts: HyperOpts::default(),
            drop_edge_attrs: false,
            drop_na: true,
            drop_null_rows: false,
            verbose: false,
            engine: EngineKind::default(),
        }
    }
}

impl HyperConfig {
    /// Parses a JSON configuration document, rejecting unknown keys.
    pub fn from_json(json: &str) -> Result<Self, HyperframeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Structural checks that do not need the input table.
    pub fn validate(&self) -> Result<(), HyperframeError> {
        if self.opts.edges.is_some() && !self.direct {
            return Err(HyperframeError::config(
                "opts.EDGES is only supported in direct mode (direct=true)",
            ));
        }
        if let Some(delim) = &self.opts.delim {
            if delim.is_empty() {
                return Err(HyperframeError::config("opts.DELIM must not be empty"));
            }
        }
        for name in self.opts.categories.keys() {
            if name.is_empty() {
                return Err(HyperframeError::config("category names must not be empty"));
            }
        }
        if let EngineKind::Partitioned { partition_rows } = self.engine {
            if partition_rows == 0 {
                return Err(HyperframeError::config("engine.partition_rows must be positive"));
            }
        }
        Ok(())
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

//==================================================================================
// III. Ring Layout Configuration
//==================================================================================

pub const MIN_R_DEFAULT: f64 = 100.0;
pub const MAX_R_DEFAULT: f64 = 1000.0;
pub const PLAY_MS_DEFAULT: u64 = 2000;

/// Options of one `time_ring` call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RingConfig {
    /// Datetime-typed node column; defaults to the first one found.
    #[serde(default)]
    pub time_col: Option<String>,

    /// Number of rings. When absent it is derived from `time_unit`, or from
    /// the node count.
    #[serde(default)]
    pub num_rings: Option<usize>,

    /// First ring instant, overriding the minimum timestamp.
    #[serde(default)]
    pub time_start: Option<NaiveDateTime>,

    /// Last ring instant, overriding the maximum timestamp.
    #[serde(default)]
    pub time_end: Option<NaiveDateTime>,

    /// Forces the rounding unit instead of selecting one.
    #[serde(default)]
    pub time_unit: Option<TimeUnit>,

    #[serde(default = "default_min_r")]
    pub min_r: f64,

    #[serde(default = "default_max_r")]
    pub max_r: f64,

    /// Place the latest time at the center.
    #[serde(default)]
    pub reverse: bool,

    /// Initial layout animation time in milliseconds.
    #[serde(default = "default_play_ms")]
    pub play_ms: u64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            time_col: None,
            num_rings: None,
            time_start: None,
            time_end: None,
            time_unit: None,
            min_r: MIN_R_DEFAULT,
            max_r: MAX_R_DEFAULT,
            reverse: false,
            play_ms: PLAY_MS_DEFAULT,
        }
    }
}

impl RingConfig {
    pub fn from_json(json: &str) -> Result<Self, HyperframeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<(), HyperframeError> {
        if self.num_rings == Some(0) {
            return Err(HyperframeError::config("num_rings must be at least 1"));
        }
        if !self.min_r.is_finite() || !self.max_r.is_finite() {
            return Err(HyperframeError::config("min_r and max_r must be finite"));
        }
        if let (Some(start), Some(end)) = (self.time_start, self.time_end) {
            if end < start {
                return Err(HyperframeError::config(format!(
                    "time_end ({}) precedes time_start ({})",
                    end, start
                )));
            }
        }
        Ok(())
    }
}

fn default_min_r() -> f64 {
    MIN_R_DEFAULT
}

fn default_max_r() -> f64 {
    MAX_R_DEFAULT
}

fn default_play_ms() -> u64 {
    PLAY_MS_DEFAULT
}

/// Formats the label of one ring from its instant, ring index and ring width.
pub type LabelFormatter = dyn Fn(NaiveDateTime, usize, TimeDelta) -> String;

/// Rewrites the whole axis, e.g. to hide every label.
pub type AxisFormatter = dyn Fn(Vec<AxisLabel>) -> Vec<AxisLabel>;

/// Caller-supplied formatting hooks. Not serializable, so kept apart from `RingConfig`.
#[derive(Default)]
pub struct RingFormatters<'a> {
    pub format_axis: Option<&'a AxisFormatter>,
    pub format_label: Option<&'a LabelFormatter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyper_config_defaults() {
        let config = HyperConfig::default();
        assert!(config.drop_na);
        assert!(!config.direct);
        assert_eq!(config.engine, EngineKind::Eager);
        assert_eq!(HyperConfig::from_json("{}").unwrap(), config);
    }

    #[test]
    fn test_hyper_config_parses_opts() {
        let config = HyperConfig::from_json(
            r#"{"direct": true,
                "opts": {"CATEGORIES": {"n": ["aa", "bb"]}, "EDGES": {"aa": ["bb"]}},
                "engine": {"kind": "partitioned"}}"#,
        )
        .unwrap();
        assert!(config.direct);
        assert_eq!(config.opts.categories["n"], vec!["aa", "bb"]);
        assert_eq!(
            config.engine,
            EngineKind::Partitioned {
                partition_rows: 65_536
            }
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(HyperConfig::from_json(r#"{"directt": true}"#).is_err());
        assert!(HyperConfig::from_json(r#"{"opts": {"CATEGORY_MAP": {}}}"#).is_err());
        assert!(RingConfig::from_json(r#"{"rings": 3}"#).is_err());
    }

    #[test]
    fn test_edges_require_direct_mode() {
        let config = HyperConfig::from_json(r#"{"opts": {"EDGES": {"a": ["b"]}}}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(HyperframeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_ring_config_parses_time_fields() {
        let config = RingConfig::from_json(
            r#"{"time_unit": "D", "time_start": "2018-01-01T00:00:00", "num_rings": 3}"#,
        )
        .unwrap();
        assert_eq!(config.time_unit, Some(TimeUnit::Day));
        assert_eq!(config.num_rings, Some(3));
        assert_eq!(config.min_r, MIN_R_DEFAULT);
        config.validate().unwrap();
    }

    #[test]
    fn test_ring_config_rejects_zero_rings() {
        let config = RingConfig {
            num_rings: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
