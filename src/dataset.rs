//! Dataset assembly: a sample matrix paired with variable metadata.
//!
//! # Overview
//!
//! [`Dataset`] is what forest growers actually receive: a column-major
//! [`SampleMatrix`] plus a [`Schema`] naming and typing each column. It can
//! be assembled column by column through [`DatasetBuilder`] (owning), bound
//! zero-copy over caller memory with [`Dataset::from_slice`] (borrowing), or
//! reserved with [`SampleMatrix::zeros`] and filled through
//! [`Dataset::set_from_f64`] by a streaming loader.
//!
//! # Example
//!
//! ```
//! use understory::Dataset;
//!
//! let dataset = Dataset::<f64>::builder()
//!     .add_variable("age", vec![31.0, 45.0, 27.0])
//!     .add_variable("height", vec![1.81, 1.66, 1.74])
//!     .add_factor("smoker", vec![1.0, 2.0, 1.0])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(dataset.n_samples(), 3);
//! assert!(dataset.schema().is_factor(2));
//! assert_eq!(dataset.variable_values(0), &[31.0, 45.0, 27.0]);
//! ```

use std::cmp::Ordering;

use log::debug;

use crate::element::Element;
use crate::error::DataError;
use crate::index::ValueIndex;
use crate::layout::ColMajor;
use crate::matrix::{SampleMatrix, ValueAccessor};
use crate::schema::{Schema, VariableMeta};
use crate::utils::Parallelism;

// =============================================================================
// Dataset
// =============================================================================

/// Training data: a column-major value matrix plus per-variable metadata.
///
/// The matrix side decides ownership (see [`SampleMatrix`]); the schema side
/// answers name lookups and records which variables are factors. Borrowed
/// datasets release nothing on drop and never write through to caller
/// memory.
#[derive(Debug, Clone)]
pub struct Dataset<'a, T = f64> {
    matrix: SampleMatrix<'a, T, ColMajor>,
    schema: Schema,
}

/// An empty dataset: no samples, no variables, safe to drop.
impl<T> Default for Dataset<'_, T> {
    fn default() -> Self {
        Self {
            matrix: SampleMatrix::default(),
            schema: Schema::default(),
        }
    }
}

impl<'a, T> Dataset<'a, T> {
    /// Wrap a matrix with an all-numeric, unnamed schema.
    pub fn from_matrix(matrix: SampleMatrix<'a, T, ColMajor>) -> Self {
        let schema = Schema::all_numeric(matrix.n_variables());
        Self { matrix, schema }
    }

    /// Pair a matrix with an explicit schema.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::SchemaMismatch`] if the schema does not describe
    /// exactly one variable per matrix column.
    pub fn new(matrix: SampleMatrix<'a, T, ColMajor>, schema: Schema) -> Result<Self, DataError> {
        if schema.n_variables() != matrix.n_variables() {
            return Err(DataError::SchemaMismatch {
                n_variables: matrix.n_variables(),
                n_meta: schema.n_variables(),
            });
        }
        Ok(Self { matrix, schema })
    }

    /// Bind caller memory as a dataset without copying.
    ///
    /// `values` must hold `n_samples * n_variables` values in column-major
    /// order. The caller keeps ownership of the buffer; the dataset borrows
    /// it for `'a` and releases nothing on drop.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::ShapeMismatch`] if the buffer length disagrees
    /// with the declared shape.
    pub fn from_slice(
        values: &'a [T],
        n_samples: usize,
        n_variables: usize,
    ) -> Result<Self, DataError> {
        let expected = n_samples * n_variables;
        if values.len() != expected {
            return Err(DataError::ShapeMismatch {
                expected,
                got: values.len(),
                what: "value buffer".to_string(),
            });
        }
        Ok(Self::from_matrix(SampleMatrix::from_slice(
            values,
            n_samples,
            n_variables,
        )))
    }

    /// Start building an owning dataset column by column.
    pub fn builder() -> DatasetBuilder<T> {
        DatasetBuilder::new()
    }

    /// Number of samples (rows).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.matrix.n_samples()
    }

    /// Number of variables (columns).
    #[inline]
    pub fn n_variables(&self) -> usize {
        self.matrix.n_variables()
    }

    /// Per-variable metadata.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The underlying value matrix.
    #[inline]
    pub fn matrix(&self) -> &SampleMatrix<'a, T, ColMajor> {
        &self.matrix
    }

    /// `true` if the value buffer borrows caller memory.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        self.matrix.is_borrowed()
    }

    /// Typed value at `(sample, variable)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, sample: usize, variable: usize) -> Option<T>
    where
        T: Copy,
    {
        self.matrix.get(sample, variable)
    }

    /// One variable's values across all samples, as a contiguous slice.
    ///
    /// # Panics
    ///
    /// Panics if `variable >= n_variables`.
    #[inline]
    pub fn variable_values(&self, variable: usize) -> &[T] {
        self.matrix.variable_slice(variable)
    }

    /// Reclassify the named variables as factors.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownVariable`] for an unrecognized name.
    pub fn mark_factors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), DataError> {
        self.schema.mark_factors(names)
    }

    /// Convert into a dataset that owns its buffer, copying if borrowed.
    pub fn into_owned(self) -> Dataset<'static, T>
    where
        T: Clone,
    {
        Dataset {
            matrix: self.matrix.into_owned(),
            schema: self.schema,
        }
    }
}

// =============================================================================
// Double-precision access and per-variable statistics
// =============================================================================

impl<'a, T: Element> Dataset<'a, T> {
    /// Value at `(sample, variable)` widened to `f64`.
    ///
    /// Returns NaN for missing values and out-of-bounds positions.
    #[inline]
    pub fn value(&self, sample: usize, variable: usize) -> f64 {
        ValueAccessor::value(&self.matrix, sample, variable)
    }

    /// Write a double-precision value, narrowing to the storage type.
    ///
    /// This is the ingestion path for loaders that parse text into `f64`
    /// regardless of how the matrix stores values. Writing to a borrowed
    /// dataset copies the buffer first; caller memory is never modified.
    ///
    /// # Errors
    ///
    /// - [`DataError::OutOfBounds`] if the position is outside the matrix.
    /// - [`DataError::ValueNotStorable`] if the storage type cannot
    ///   represent `value`. Nothing is written in either case.
    ///
    /// # Example
    ///
    /// ```
    /// use understory::{Dataset, SampleMatrix};
    ///
    /// let mut dataset = Dataset::from_matrix(SampleMatrix::<u8>::zeros(2, 1));
    /// dataset.set_from_f64(0, 0, 2.0).unwrap();
    /// assert!(dataset.set_from_f64(1, 0, 300.0).is_err());
    /// ```
    pub fn set_from_f64(
        &mut self,
        sample: usize,
        variable: usize,
        value: f64,
    ) -> Result<(), DataError> {
        if sample >= self.n_samples() || variable >= self.n_variables() {
            return Err(DataError::OutOfBounds {
                sample,
                variable,
                n_samples: self.n_samples(),
                n_variables: self.n_variables(),
            });
        }
        let stored = T::from_f64(value).ok_or(DataError::ValueNotStorable { value, variable })?;
        self.matrix.set(sample, variable, stored);
        Ok(())
    }

    /// `true` if any cell holds a missing value.
    pub fn has_missing(&self) -> bool {
        self.matrix.has_missing()
    }

    /// Sorted distinct values of `variable` over the given sample subset.
    ///
    /// Split finding uses this to enumerate candidate thresholds for a node.
    /// Missing values are skipped; an all-missing subset yields an empty
    /// vector. Distinctness follows the total order, so `-0.0` and `+0.0`
    /// stay separate entries, agreeing with
    /// [`ValueIndex::unique_values`](crate::ValueIndex::unique_values).
    ///
    /// # Panics
    ///
    /// Panics if `variable` is out of bounds or `samples` contains an
    /// out-of-range sample id.
    pub fn sorted_unique_values(&self, variable: usize, samples: &[usize]) -> Vec<f64> {
        let column = self.matrix.variable_slice(variable);
        let mut values: Vec<f64> = samples
            .iter()
            .map(|&sample| column[sample].to_f64())
            .filter(|value| !value.is_nan())
            .collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
        values
    }

    /// Smallest and largest observed value of `variable` over `samples`.
    ///
    /// Returns `None` when the subset is empty or every value is missing.
    ///
    /// # Panics
    ///
    /// Panics like [`sorted_unique_values`](Self::sorted_unique_values).
    pub fn min_max(&self, variable: usize, samples: &[usize]) -> Option<(f64, f64)> {
        let column = self.matrix.variable_slice(variable);
        let mut bounds: Option<(f64, f64)> = None;
        for &sample in samples {
            let value = column[sample].to_f64();
            if value.is_nan() {
                continue;
            }
            bounds = Some(match bounds {
                None => (value, value),
                Some((lo, hi)) => (value.min(lo), value.max(hi)),
            });
        }
        bounds
    }

    /// Build the sorted-value index for this dataset.
    pub fn build_index(&self, parallelism: Parallelism) -> ValueIndex {
        ValueIndex::build(self, parallelism)
    }
}

impl<T: Element> ValueAccessor for Dataset<'_, T> {
    #[inline]
    fn value(&self, sample: usize, variable: usize) -> f64 {
        ValueAccessor::value(&self.matrix, sample, variable)
    }

    #[inline]
    fn n_samples(&self) -> usize {
        self.matrix.n_samples()
    }

    #[inline]
    fn n_variables(&self) -> usize {
        self.matrix.n_variables()
    }
}

// =============================================================================
// DatasetBuilder
// =============================================================================

/// Column-by-column constructor for owning datasets.
///
/// Columns are collected as-is and validated once in
/// [`build`](DatasetBuilder::build): every column must have the same length
/// and names must be unique.
#[derive(Debug)]
pub struct DatasetBuilder<T = f64> {
    columns: Vec<Vec<T>>,
    metas: Vec<VariableMeta>,
}

impl<T> DatasetBuilder<T> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            metas: Vec::new(),
        }
    }

    /// Append a named numeric variable; one value per sample.
    pub fn add_variable(mut self, name: impl Into<String>, values: Vec<T>) -> Self {
        self.metas.push(VariableMeta::numeric_named(name));
        self.columns.push(values);
        self
    }

    /// Append an unnamed numeric variable.
    pub fn add_unnamed(mut self, values: Vec<T>) -> Self {
        self.metas.push(VariableMeta::numeric());
        self.columns.push(values);
        self
    }

    /// Append a named factor variable; values are numeric level codes.
    pub fn add_factor(mut self, name: impl Into<String>, values: Vec<T>) -> Self {
        self.metas.push(VariableMeta::factor_named(name));
        self.columns.push(values);
        self
    }

    /// Assemble the dataset, concatenating columns into one column-major
    /// buffer.
    ///
    /// # Errors
    ///
    /// - [`DataError::EmptyDataset`] if no variables were added.
    /// - [`DataError::ShapeMismatch`] if a column's length disagrees with
    ///   the first column.
    /// - [`DataError::DuplicateVariable`] if two variables share a name.
    pub fn build(self) -> Result<Dataset<'static, T>, DataError> {
        if self.columns.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        let n_samples = self.columns[0].len();
        for (i, column) in self.columns.iter().enumerate() {
            if column.len() != n_samples {
                let what = match &self.metas[i].name {
                    Some(name) => format!("variable `{}`", name),
                    None => format!("variable {}", i),
                };
                return Err(DataError::ShapeMismatch {
                    expected: n_samples,
                    got: column.len(),
                    what,
                });
            }
        }
        let schema = Schema::from_variables(self.metas)?;

        let n_variables = self.columns.len();
        let mut values = Vec::with_capacity(n_samples * n_variables);
        for column in self.columns {
            values.extend(column);
        }
        debug!(
            "assembled dataset: {} samples x {} variables",
            n_samples, n_variables
        );
        let matrix = SampleMatrix::from_vec(values, n_samples, n_variables);
        Ok(Dataset { matrix, schema })
    }
}

impl<T> Default for DatasetBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
