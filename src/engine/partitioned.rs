// In: src/engine/partitioned.rs

//! An engine that runs row-local operations over fixed-size partitions.
//!
//! Row-local kernels (filtering, null tests, stringification) run once per
//! partition and their outputs are concatenated in partition order, so row
//! order is identical to the eager engine. Operations that need the whole
//! table (dedup, gather) first assemble their keys across partitions.

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, StringArray, UInt32Array};
use arrow::compute::{concat, concat_batches, filter_record_batch, take_record_batch};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use super::{column, first_occurrences, format_cells, partitions, EagerEngine, TabularEngine};
use crate::config::EngineKind;
use crate::error::HyperframeError;
use crate::null_handling::mask::{self, RowMask};

#[derive(Debug, Clone, Copy)]
pub struct PartitionedEngine {
    partition_rows: usize,
}

impl PartitionedEngine {
    pub fn new(partition_rows: usize) -> Self {
        Self {
            partition_rows: partition_rows.max(1),
        }
    }

    pub fn partition_rows(&self) -> usize {
        self.partition_rows
    }
}

impl TabularEngine for PartitionedEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Partitioned {
            partition_rows: self.partition_rows,
        }
    }

    fn select(&self, batch: &RecordBatch, columns: &[&str]) -> Result<RecordBatch, HyperframeError> {
        // Projection is metadata-only; no need to split.
        EagerEngine.select(batch, columns)
    }

    fn filter(
        &self,
        batch: &RecordBatch,
        predicate: &BooleanArray,
    ) -> Result<RecordBatch, HyperframeError> {
        if predicate.len() != batch.num_rows() {
            return Err(HyperframeError::InternalError(format!(
                "Filter predicate length ({}) does not match table rows ({})",
                predicate.len(),
                batch.num_rows()
            )));
        }
        let mut parts = Vec::new();
        for (offset, length) in partitions(batch.num_rows(), self.partition_rows) {
            let part = batch.slice(offset, length);
            let part_predicate = predicate.slice(offset, length);
            parts.push(filter_record_batch(&part, &part_predicate)?);
        }
        Ok(concat_batches(&batch.schema(), &parts)?)
    }

    fn valid_mask(&self, batch: &RecordBatch, columns: &[&str]) -> Result<RowMask, HyperframeError> {
        let arrays = columns
            .iter()
            .map(|name| column(batch, name).cloned())
            .collect::<Result<Vec<ArrayRef>, _>>()?;

        let mut out = RowMask::with_capacity(batch.num_rows());
        for (offset, length) in partitions(batch.num_rows(), self.partition_rows) {
            let slices: Vec<ArrayRef> = arrays.iter().map(|a| a.slice(offset, length)).collect();
            let refs: Vec<&dyn Array> = slices.iter().map(|a| a.as_ref()).collect();
            out.extend_from_bitslice(&mask::valid_rows(&refs, length)?);
        }
        Ok(out)
    }

    fn stringify(&self, column: &dyn Array, null_val: &str) -> Result<StringArray, HyperframeError> {
        if column.len() <= self.partition_rows {
            return format_cells(column, null_val);
        }
        let mut parts = Vec::new();
        for (offset, length) in partitions(column.len(), self.partition_rows) {
            let part = column.slice(offset, length);
            parts.push(format_cells(part.as_ref(), null_val)?);
        }
        let refs: Vec<&dyn Array> = parts.iter().map(|p| p as &dyn Array).collect();
        let joined = concat(&refs)?;
        Ok(joined.as_string::<i32>().clone())
    }

    fn take_rows(
        &self,
        batch: &RecordBatch,
        indices: &UInt32Array,
    ) -> Result<RecordBatch, HyperframeError> {
        // A gather crosses partitions by nature; it runs on the assembled batch.
        Ok(take_record_batch(batch, indices)?)
    }

    fn concat(
        &self,
        schema: &SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<RecordBatch, HyperframeError> {
        Ok(concat_batches(schema, batches)?)
    }

    fn dedup_by(&self, batch: &RecordBatch, keys: &[&str]) -> Result<RecordBatch, HyperframeError> {
        let key_strings = keys
            .iter()
            .map(|name| column(batch, name).and_then(|c| self.stringify(c.as_ref(), "")))
            .collect::<Result<Vec<_>, _>>()?;
        let kept = first_occurrences(&key_strings);
        if kept.len() == batch.num_rows() {
            return Ok(batch.clone());
        }
        self.take_rows(batch, &kept)
    }
}
