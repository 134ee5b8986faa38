//! This file is the root of the `hyperframe` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`hyper`, `layout`, etc.)
//!     so the Rust compiler knows they exist, and re-exporting the public entry points.
//! 2.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python (`python` feature only).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod hyper;
pub mod layout;
pub mod null_handling;
pub mod types;

#[cfg(feature = "python")]
mod ffi;

pub use config::{EngineKind, HyperConfig, HyperOpts, RingConfig, RingFormatters};
pub use error::HyperframeError;
pub use graph::Graph;
pub use hyper::{hypergraph, hypergraph_with_engine, HypergraphResult};
pub use layout::{time_ring, AxisLabel};

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `hyperframe` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn hyperframe(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::hypergraph_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::time_ring_py, m)?)?;

    // --- Expose the custom error type ---
    m.add(
        "HyperframeError",
        m.py().get_type_bound::<pyo3::exceptions::PyValueError>(),
    )?;

    m.add("__version__", VERSION)?;

    m.add_function(wrap_pyfunction!(ffi::enable_verbose_logging_py, m)?)?;

    Ok(())
}
