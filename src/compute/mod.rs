//! Column-level compute helpers that sit next to the graph builders.
//!
//! Currently this is only the numeric predicate family, used to pre-filter
//! record tables or node tables through a `TabularEngine`.

pub mod predicates;

pub use predicates::NumericPredicate;
