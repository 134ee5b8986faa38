// --- IN: src/null_handling/mask.rs ---

//! Pure, stateless kernels for row masks. A set bit means "row is kept".

use arrow::array::{Array, BooleanArray};
use bitvec::prelude::*;

use crate::error::HyperframeError;

/// Row mask type used across the crate.
pub type RowMask = BitVec<usize, Lsb0>;

/// Builds a mask that is set where every one of `columns` is non-null.
///
/// # Args
/// * `columns`: the arrays to test; all must share `num_rows`.
/// * `num_rows`: the row count of the owning table (used when `columns` is empty).
pub fn valid_rows(columns: &[&dyn Array], num_rows: usize) -> Result<RowMask, HyperframeError> {
    let mut mask: RowMask = bitvec![usize, Lsb0; 1; num_rows];

    for column in columns {
        if column.len() != num_rows {
            return Err(HyperframeError::InternalError(format!(
                "Column length ({}) does not match table rows ({})",
                column.len(),
                num_rows
            )));
        }
        // Columns without a null buffer cannot clear any bit.
        if let Some(nulls) = column.nulls() {
            for (row, valid) in nulls.iter().enumerate() {
                if !valid {
                    mask.set(row, false);
                }
            }
        }
    }
    Ok(mask)
}

/// Converts a row mask into an Arrow filter predicate.
pub fn to_boolean_array(mask: &RowMask) -> BooleanArray {
    BooleanArray::from_iter(mask.iter().map(|bit| Some(*bit)))
}

/// True when no row is dropped.
pub fn is_all_set(mask: &RowMask) -> bool {
    mask.all()
}
