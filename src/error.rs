// In: src/error.rs

//! This module defines the single, unified error type for the entire hyperframe library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HyperframeError {
    // =========================================================================
    // === Configuration Errors (raised before any table is produced)
    // =========================================================================
    #[error("Column not found in table: {0}")]
    MissingColumn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Column '{column}' must be {expected}, received {actual}")]
    InvalidColumnType {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Expected nodes table")]
    MissingNodes,

    #[error("Cannot derive a time range: no non-null timestamps and no explicit time_start/time_end")]
    EmptyTimeRange,

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library. Backend failures are
    /// never retried or masked; they surface through this variant unchanged.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error from the Serde JSON library, typically while parsing a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error for Python FFI (Foreign Function Interface) operations.
    #[error("FFI operation failed: {0}")]
    FfiError(String), // PyErr doesn't impl Error, so we can't use #[from] here.
}

impl HyperframeError {
    /// Shorthand used by the validators.
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        HyperframeError::InvalidConfig(msg.into())
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for HyperframeError {
    fn from(err: pyo3::PyErr) -> Self {
        HyperframeError::FfiError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<HyperframeError> for pyo3::PyErr {
    fn from(err: HyperframeError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
