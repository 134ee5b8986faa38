// In: src/ffi/python.rs

use arrow::pyarrow::{PyArrowType, ToPyArrow};
use arrow::record_batch::RecordBatch;
use log::LevelFilter;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::fs::OpenOptions;
use std::sync::Once;

use crate::config::{HyperConfig, RingConfig, RingFormatters};
use crate::graph::Graph;
use crate::error::HyperframeError;

fn parse_or_default<T: Default>(
    json: Option<&str>,
    parse: fn(&str) -> Result<T, HyperframeError>,
) -> Result<T, HyperframeError> {
    match json {
        Some(text) => parse(text),
        None => Ok(T::default()),
    }
}

//==================================================================================
// I. Graph Construction
//==================================================================================

/// Builds a hypergraph from a PyArrow RecordBatch.
///
/// Returns a dict with the `entities`, `events`, `edges` and `nodes` batches
/// plus the JSON-encoded `bindings` of the resulting graph.
#[pyfunction]
#[pyo3(name = "hypergraph", signature = (table, entity_types = None, config_json = None))]
pub fn hypergraph_py<'py>(
    py: Python<'py>,
    table: PyArrowType<RecordBatch>,
    entity_types: Option<Vec<String>>,
    config_json: Option<&str>,
) -> PyResult<Bound<'py, PyDict>> {
    let config = parse_or_default(config_json, HyperConfig::from_json)?;
    let table = table.0;

    let result = py.allow_threads(|| {
        crate::hyper::hypergraph(&Graph::new(), &table, entity_types.as_deref(), &config)
    })?;

    let out = PyDict::new_bound(py);
    out.set_item("entities", result.entities.to_pyarrow(py)?)?;
    out.set_item("events", result.events.to_pyarrow(py)?)?;
    out.set_item("edges", result.edges.to_pyarrow(py)?)?;
    out.set_item("nodes", result.nodes.to_pyarrow(py)?)?;
    let bindings = serde_json::to_string(result.graph.bindings()).map_err(HyperframeError::from)?;
    out.set_item("bindings", bindings)?;
    Ok(out)
}

//==================================================================================
// II. Layout
//==================================================================================

/// Positions a nodes batch on time rings.
///
/// Returns `(nodes, axis_json, url_params_json)`. Formatter callbacks are not
/// exposed; callers rewrite the axis JSON on the Python side instead.
#[pyfunction]
#[pyo3(name = "time_ring", signature = (nodes, config_json = None))]
pub fn time_ring_py(
    py: Python,
    nodes: PyArrowType<RecordBatch>,
    config_json: Option<&str>,
) -> PyResult<(PyObject, String, String)> {
    let config = parse_or_default(config_json, RingConfig::from_json)?;
    let g = Graph::new().with_nodes(nodes.0);

    let laid_out =
        py.allow_threads(|| crate::layout::time_ring(&g, &config, &RingFormatters::default()))?;

    let positioned = laid_out.nodes().ok_or(HyperframeError::MissingNodes)?;
    let axis = serde_json::to_string(&laid_out.encodings().axis).map_err(HyperframeError::from)?;
    let params = serde_json::to_string(laid_out.url_params()).map_err(HyperframeError::from)?;
    Ok((positioned.to_pyarrow(py)?, axis, params))
}

//==================================================================================
// III. Logging
//==================================================================================

static INIT_LOGGER: Once = Once::new();

/// Routes library logs to stderr, or appends them to `log_file`.
#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) -> PyResult<()> {
    let target = match log_file {
        Some(path) => Some(
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(&path)
                .map_err(|e| HyperframeError::FfiError(format!("cannot open {path}: {e}")))?,
        ),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
