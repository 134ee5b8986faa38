// In: src/engine/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Engine Layer
// ====================================================================================
//
// The hypergraph builder never touches a concrete backend. Every table operation it
// needs goes through the `TabularEngine` capability trait, and the concrete engine is
// chosen once per call from `HyperConfig::engine`:
//
//   1. [hyper::hypergraph]            -> resolve_engine(&config.engine)
//         |
//         `-> Box<dyn TabularEngine>
//
//   2. [EagerEngine]                   -> whole-batch Arrow compute kernels
//   3. [PartitionedEngine]             -> the same kernels over fixed-size row partitions,
//                                         results concatenated; dedup stays global
//
// Both engines must produce row-identical results for the same input.
// Arrow `RecordBatch` is the interchange format on both sides of the boundary.
//
// ====================================================================================

pub mod eager;
pub mod partitioned;

pub use eager::EagerEngine;
pub use partitioned::PartitionedEngine;

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, StringArray, StringBuilder, UInt32Array};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use hashbrown::HashSet;

use crate::config::EngineKind;
use crate::error::HyperframeError;
use crate::null_handling::mask::RowMask;

//==================================================================================
// 1. The Capability Trait
//==================================================================================

/// Uniform table operations consumed by the hypergraph builder.
pub trait TabularEngine {
    fn kind(&self) -> EngineKind;

    /// Projects `columns`, in the given order.
    fn select(&self, batch: &RecordBatch, columns: &[&str]) -> Result<RecordBatch, HyperframeError>;

    /// Keeps rows where `predicate` is true.
    fn filter(
        &self,
        batch: &RecordBatch,
        predicate: &BooleanArray,
    ) -> Result<RecordBatch, HyperframeError>;

    /// Rows where every listed column is non-null.
    fn valid_mask(&self, batch: &RecordBatch, columns: &[&str]) -> Result<RowMask, HyperframeError>;

    /// Stringifies every cell; null cells become `null_val`.
    fn stringify(&self, column: &dyn Array, null_val: &str) -> Result<StringArray, HyperframeError>;

    /// Gathers rows by index.
    fn take_rows(
        &self,
        batch: &RecordBatch,
        indices: &UInt32Array,
    ) -> Result<RecordBatch, HyperframeError>;

    /// Concatenates batches sharing `schema`. An empty slice yields an empty table.
    fn concat(
        &self,
        schema: &SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<RecordBatch, HyperframeError>;

    /// Keeps the first row of every distinct key tuple, preserving row order.
    fn dedup_by(&self, batch: &RecordBatch, keys: &[&str]) -> Result<RecordBatch, HyperframeError>;
}

/// Creates the engine selected by `kind`.
pub fn resolve_engine(kind: &EngineKind) -> Box<dyn TabularEngine> {
    match kind {
        EngineKind::Eager => Box::new(EagerEngine),
        EngineKind::Partitioned { partition_rows } => {
            Box::new(PartitionedEngine::new(*partition_rows))
        }
    }
}

//==================================================================================
// 2. Shared Kernels
//==================================================================================

/// Looks up a column by name, failing with a configuration error when absent.
pub(crate) fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, HyperframeError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| HyperframeError::MissingColumn(name.to_string()))
}

/// Display-formats every cell of `array`.
pub(crate) fn format_cells(array: &dyn Array, null_val: &str) -> Result<StringArray, HyperframeError> {
    // Fast path: Utf8 needs no formatting, only null substitution.
    if let Some(strings) = array.as_string_opt::<i32>() {
        return Ok(strings
            .iter()
            .map(|v| Some(v.unwrap_or(null_val)))
            .collect());
    }

    let options = FormatOptions::default().with_null(null_val);
    let formatter = ArrayFormatter::try_new(array, &options)?;
    let mut builder = StringBuilder::with_capacity(array.len(), array.len() * 8);
    for row in 0..array.len() {
        builder.append_value(formatter.value(row).to_string());
    }
    Ok(builder.finish())
}

/// Index of the first occurrence of every distinct key tuple, in row order.
pub(crate) fn first_occurrences(keys: &[StringArray]) -> UInt32Array {
    let num_rows = keys.first().map(|k| k.len()).unwrap_or(0);
    let mut seen: HashSet<Vec<&str>> = HashSet::with_capacity(num_rows);
    let mut kept = Vec::with_capacity(num_rows);

    for row in 0..num_rows {
        let tuple: Vec<&str> = keys.iter().map(|k| k.value(row)).collect();
        if seen.insert(tuple) {
            kept.push(row as u32);
        }
    }
    UInt32Array::from(kept)
}

/// Yields `(offset, length)` pairs covering `num_rows` in chunks of `size`.
pub(crate) fn partitions(num_rows: usize, size: usize) -> impl Iterator<Item = (usize, usize)> {
    let size = size.max(1);
    (0..num_rows)
        .step_by(size)
        .map(move |offset| (offset, size.min(num_rows - offset)))
}

#[cfg(test)]
mod tests;
