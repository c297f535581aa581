//! Error types for dataset assembly and value writes.

use thiserror::Error;

/// Errors raised while assembling a dataset or writing values into one.
///
/// Construction of a [`SampleMatrix`](crate::SampleMatrix) from pre-validated
/// parts panics on dimension mismatch instead; these variants cover the
/// fallible surfaces where data arrives from outside the crate.
#[derive(Error, Debug)]
pub enum DataError {
    /// A dataset was built with zero variables.
    #[error("dataset has no variables")]
    EmptyDataset,

    /// A buffer or column had a different length than the declared shape.
    #[error("{what}: expected {expected} values, got {got}")]
    ShapeMismatch {
        expected: usize,
        got: usize,
        what: String,
    },

    /// A schema describes a different number of variables than the matrix holds.
    #[error("schema describes {n_meta} variables but the matrix has {n_variables}")]
    SchemaMismatch { n_variables: usize, n_meta: usize },

    /// Two variables were registered under the same name.
    #[error("duplicate variable name `{0}`")]
    DuplicateVariable(String),

    /// A lookup referenced a variable name the schema does not contain.
    #[error("unknown variable name `{0}`")]
    UnknownVariable(String),

    /// A value could not be represented in the storage type of the target
    /// variable (out of range, or fractional for an integer-backed matrix).
    #[error("value {value} cannot be stored in variable {variable}")]
    ValueNotStorable { value: f64, variable: usize },

    /// A write addressed a cell outside the matrix.
    #[error("position ({sample}, {variable}) is outside a {n_samples}x{n_variables} matrix")]
    OutOfBounds {
        sample: usize,
        variable: usize,
        n_samples: usize,
        n_variables: usize,
    },
}
