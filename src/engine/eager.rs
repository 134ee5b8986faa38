// In: src/engine/eager.rs

//! The default engine: every operation is one whole-batch Arrow kernel call.

use arrow::array::{Array, BooleanArray, StringArray, UInt32Array};
use arrow::compute::{concat_batches, filter_record_batch, take_record_batch};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use super::{column, first_occurrences, format_cells, TabularEngine};
use crate::config::EngineKind;
use crate::error::HyperframeError;
use crate::null_handling::mask::{self, RowMask};

#[derive(Debug, Default, Clone, Copy)]
pub struct EagerEngine;

impl TabularEngine for EagerEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Eager
    }

    fn select(&self, batch: &RecordBatch, columns: &[&str]) -> Result<RecordBatch, HyperframeError> {
        let schema = batch.schema();
        let indices = columns
            .iter()
            .map(|name| {
                schema
                    .index_of(name)
                    .map_err(|_| HyperframeError::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(batch.project(&indices)?)
    }

    fn filter(
        &self,
        batch: &RecordBatch,
        predicate: &BooleanArray,
    ) -> Result<RecordBatch, HyperframeError> {
        Ok(filter_record_batch(batch, predicate)?)
    }

    fn valid_mask(&self, batch: &RecordBatch, columns: &[&str]) -> Result<RowMask, HyperframeError> {
        let arrays = columns
            .iter()
            .map(|name| column(batch, name).map(|c| c.as_ref()))
            .collect::<Result<Vec<&dyn Array>, _>>()?;
        mask::valid_rows(&arrays, batch.num_rows())
    }

    fn stringify(&self, column: &dyn Array, null_val: &str) -> Result<StringArray, HyperframeError> {
        format_cells(column, null_val)
    }

    fn take_rows(
        &self,
        batch: &RecordBatch,
        indices: &UInt32Array,
    ) -> Result<RecordBatch, HyperframeError> {
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
