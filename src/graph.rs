// In: src/graph.rs

//! The graph value returned by both pipelines.
//!
//! A `Graph` is an immutable bundle of Arrow tables plus the bindings and
//! display encodings a renderer needs. Builder methods consume `self` and
//! return a new value; tables are `Arc`-backed so this never copies data.

use std::collections::BTreeMap;

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layout::AxisLabel;

/// Which columns carry edge endpoints and node ids.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphBindings {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub node: Option<String>,
}

/// Point colour driven by a node column.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColorEncoding {
    pub column: String,
    pub palette: Vec<String>,
    pub as_continuous: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Encodings {
    /// Radial axis rings, ordered outward from the center.
    pub axis: Option<Vec<AxisLabel>>,
    pub point_color: Option<ColorEncoding>,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Option<RecordBatch>,
    edges: Option<RecordBatch>,
    bindings: GraphBindings,
    encodings: Encodings,
    url_params: BTreeMap<String, Value>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(mut self, nodes: RecordBatch) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn with_edges(mut self, edges: RecordBatch) -> Self {
        self.edges = Some(edges);
        self
    }

    pub fn bind(mut self, source: &str, destination: &str, node: &str) -> Self {
        self.bindings = GraphBindings {
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
            node: Some(node.to_string()),
        };
        self
    }

    pub fn encode_axis(mut self, axis: Vec<AxisLabel>) -> Self {
        self.encodings.axis = Some(axis);
        self
    }

    pub fn encode_point_color(mut self, column: &str, palette: &[&str], as_continuous: bool) -> Self {
        self.encodings.point_color = Some(ColorEncoding {
            column: column.to_string(),
            palette: palette.iter().map(|c| c.to_string()).collect(),
            as_continuous,
        });
        self
    }

    /// Merges renderer URL parameters; later values win.
    pub fn settings<I, K>(mut self, url_params: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in url_params {
            self.url_params.insert(key.into(), value);
        }
        self
    }

    pub fn nodes(&self) -> Option<&RecordBatch> {
        self.nodes.as_ref()
    }

    pub fn edges(&self) -> Option<&RecordBatch> {
        self.edges.as_ref()
    }

    pub fn bindings(&self) -> &GraphBindings {
        &self.bindings
    }

    pub fn encodings(&self) -> &Encodings {
        &self.encodings
    }

    pub fn url_params(&self) -> &BTreeMap<String, Value> {
        &self.url_params
    }
}
