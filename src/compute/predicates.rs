// In: src/compute/predicates.rs

//! Numeric column predicates.
//!
//! A `NumericPredicate` evaluates to a `BooleanArray` with no null slots, so
//! its output can be handed straight to `TabularEngine::filter`. Null input
//! cells never satisfy a comparison; only `IsNa` selects them.

use arrow::array::{Array, BooleanArray, Float64Array, Scalar};
use arrow::compute::kernels::cmp;
use arrow::compute::{and, cast, is_not_null, is_null, prep_null_mask_filter};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::engine::{column, TabularEngine};
use crate::error::HyperframeError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NumericPredicate {
    Gt { val: f64 },
    Lt { val: f64 },
    Ge { val: f64 },
    Le { val: f64 },
    Eq { val: f64 },
    Ne { val: f64 },
    Between {
        lower: f64,
        upper: f64,
        #[serde(default = "default_inclusive")]
        inclusive: bool,
    },
    IsNa,
    NotNa,
}

fn default_inclusive() -> bool {
    true
}

impl NumericPredicate {
    pub fn gt(val: f64) -> Self {
        NumericPredicate::Gt { val }
    }

    pub fn lt(val: f64) -> Self {
        NumericPredicate::Lt { val }
    }

    pub fn ge(val: f64) -> Self {
        NumericPredicate::Ge { val }
    }

    pub fn le(val: f64) -> Self {
        NumericPredicate::Le { val }
    }

    pub fn eq(val: f64) -> Self {
        NumericPredicate::Eq { val }
    }

    pub fn ne(val: f64) -> Self {
        NumericPredicate::Ne { val }
    }

    pub fn between(lower: f64, upper: f64, inclusive: bool) -> Self {
        NumericPredicate::Between {
            lower,
            upper,
            inclusive,
        }
    }

    pub fn isna() -> Self {
        NumericPredicate::IsNa
    }

    pub fn notna() -> Self {
        NumericPredicate::NotNa
    }

    /// Evaluates the predicate over every cell of `values`.
    pub fn evaluate(&self, values: &dyn Array) -> Result<BooleanArray, HyperframeError> {
        // Null tests work on any type.
        match self {
            NumericPredicate::IsNa => return Ok(is_null(values)?),
            NumericPredicate::NotNa => return Ok(is_not_null(values)?),
            _ => {}
        }

        if !values.data_type().is_numeric() {
            return Err(HyperframeError::InvalidColumnType {
                column: "<predicate input>".to_string(),
                expected: "a numeric column".to_string(),
                actual: values.data_type().to_string(),
            });
        }
        let floats = cast(values, &DataType::Float64)?;
        let scalar = |v: f64| Scalar::new(Float64Array::from(vec![v]));

        let raw = match *self {
            NumericPredicate::Gt { val } => cmp::gt(&floats, &scalar(val))?,
            NumericPredicate::Lt { val } => cmp::lt(&floats, &scalar(val))?,
            NumericPredicate::Ge { val } => cmp::gt_eq(&floats, &scalar(val))?,
            NumericPredicate::Le { val } => cmp::lt_eq(&floats, &scalar(val))?,
            NumericPredicate::Eq { val } => cmp::eq(&floats, &scalar(val))?,
            NumericPredicate::Ne { val } => cmp::neq(&floats, &scalar(val))?,
            NumericPredicate::Between {
                lower,
                upper,
                inclusive: true,
            } => and(
                &cmp::gt_eq(&floats, &scalar(lower))?,
                &cmp::lt_eq(&floats, &scalar(upper))?,
            )?,
            NumericPredicate::Between {
                lower,
                upper,
                inclusive: false,
            } => and(
                &cmp::gt(&floats, &scalar(lower))?,
                &cmp::lt(&floats, &scalar(upper))?,
            )?,
            NumericPredicate::IsNa | NumericPredicate::NotNa => {
                return Err(HyperframeError::InternalError(
                    "null tests are handled before casting".to_string(),
                ))
            }
        };
        Ok(prep_null_mask_filter(&raw))
    }

    /// Keeps the rows of `batch` whose `name` cell satisfies the predicate.
    pub fn filter(
        &self,
        engine: &dyn TabularEngine,
        batch: &RecordBatch,
        name: &str,
    ) -> Result<RecordBatch, HyperframeError> {
        let values = column(batch, name)?;
        let mask = self.evaluate(values.as_ref()).map_err(|err| match err {
            HyperframeError::InvalidColumnType {
                expected, actual, ..
            } => HyperframeError::InvalidColumnType {
                column: name.to_string(),
                expected,
                actual,
            },
            other => other,
        })?;
        engine.filter(batch, &mask)
    }
}
