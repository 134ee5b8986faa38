//! Row-validity kernels shared by both tabular engines.
//!
//! Arrow stores validity per column; the hypergraph policies need it per row
//! and across several columns at once. These helpers fold column validity
//! into a `BitVec` row mask and convert masks back into Arrow inputs.

pub mod mask;
