// In: src/ffi/mod.rs

//! Python entry points. Only compiled with the `python` feature.

pub mod python;

pub use python::{enable_verbose_logging_py, hypergraph_py, time_ring_py};
