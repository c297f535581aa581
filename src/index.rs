//! Sorted-value index over a dataset.
//!
//! # Overview
//!
//! Split finding does not want raw values; it wants, per variable, the sorted
//! distinct values (the candidate thresholds) and, per cell, the position of
//! that cell's value within them. [`ValueIndex`] precomputes both once so
//! node evaluation can work over compact `u32` ranks instead of comparing
//! doubles.
//!
//! The index is built from any [`ValueAccessor`], so it is independent of the
//! matrix storage type: a `u8`-backed matrix produces the same index as the
//! `f64` matrix it narrows.
//!
//! # Ranks
//!
//! For each variable `v`, `unique_values(v)` is strictly increasing and
//! `value_at_rank(v, rank(s, v))` recovers the value observed at sample `s`.
//! Distinctness follows `f64::total_cmp`, so `-0.0` and `+0.0` are separate
//! neighboring entries. Missing values collapse into a single entry ordered
//! after every finite value and infinity.
//!
//! # Example
//!
//! ```
//! use understory::{Parallelism, SampleMatrix, ValueIndex};
//!
//! let matrix = SampleMatrix::<f64>::from_vec(vec![2.0, 1.0, 2.0, 9.0], 4, 1);
//! let index = ValueIndex::build(&matrix, Parallelism::Sequential);
//!
//! assert_eq!(index.unique_values(0), &[1.0, 2.0, 9.0]);
//! assert_eq!(index.rank(0, 0), 1); // 2.0 is the second distinct value
//! assert_eq!(index.value_at_rank(0, index.rank(3, 0)), 9.0);
//! ```

use std::cmp::Ordering;
use std::time::Instant;

use log::debug;

use crate::matrix::ValueAccessor;
use crate::utils::Parallelism;

// =============================================================================
// ValueIndex
// =============================================================================

/// Per-variable sorted distinct values plus per-cell rank codes.
///
/// Ranks are stored column-major (`variable * n_samples + sample`) in `u32`,
/// a quarter of the footprint of the doubles they stand in for.
#[derive(Debug, Clone)]
pub struct ValueIndex {
    /// Sorted distinct values per variable; missing is at most one trailing NaN.
    unique: Vec<Box<[f64]>>,
    /// Column-major rank codes.
    ranks: Box<[u32]>,
    n_samples: usize,
    n_variables: usize,
    max_n_unique: usize,
}

impl ValueIndex {
    /// Build the index, one variable at a time.
    ///
    /// With [`Parallelism::Parallel`] the per-variable work fans out over the
    /// current rayon pool; the result is identical either way.
    ///
    /// # Panics
    ///
    /// Panics if `data` has more samples than a `u32` rank can address.
    pub fn build<A: ValueAccessor + Sync>(data: &A, parallelism: Parallelism) -> Self {
        let n_samples = data.n_samples();
        let n_variables = data.n_variables();
        assert!(
            n_samples <= u32::MAX as usize,
            "Rank storage is u32; {} samples exceed it",
            n_samples
        );

        let started = Instant::now();
        let per_variable = parallelism.maybe_par_map(0..n_variables, |variable| {
            // One NaN bit pattern for every missing cell, so missing dedups
            // into a single trailing entry.
            let column: Vec<f64> = (0..n_samples)
                .map(|sample| {
                    let value = data.value(sample, variable);
                    if value.is_nan() {
                        f64::NAN
                    } else {
                        value
                    }
                })
                .collect();

            let mut unique = column.clone();
            unique.sort_by(|a, b| a.total_cmp(b));
            unique.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);

            let ranks: Vec<u32> = column
                .iter()
                .map(|value| {
                    let rank = unique
                        .binary_search_by(|probe| probe.total_cmp(value))
                        .expect("column value missing from its own distinct set");
                    rank as u32
                })
                .collect();

            (unique.into_boxed_slice(), ranks)
        });

        let mut unique = Vec::with_capacity(n_variables);
        let mut ranks = Vec::with_capacity(n_samples * n_variables);
        for (variable_unique, variable_ranks) in per_variable {
            unique.push(variable_unique);
            ranks.extend(variable_ranks);
        }
        let max_n_unique = unique.iter().map(|u| u.len()).max().unwrap_or(0);

        debug!(
            "value index built: {} samples x {} variables, max {} distinct values, {:?}",
            n_samples,
            n_variables,
            max_n_unique,
            started.elapsed()
        );

        Self {
            unique,
            ranks: ranks.into_boxed_slice(),
            n_samples,
            n_variables,
            max_n_unique,
        }
    }

    /// Number of samples the index covers.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of variables the index covers.
    #[inline]
    pub fn n_variables(&self) -> usize {
        self.n_variables
    }

    /// Largest distinct-value count over all variables.
    ///
    /// Useful for sizing per-node scratch buffers once.
    #[inline]
    pub fn max_n_unique(&self) -> usize {
        self.max_n_unique
    }

    /// Number of distinct values of `variable` (missing counts once).
    #[inline]
    pub fn n_unique(&self, variable: usize) -> usize {
        self.unique_values(variable).len()
    }

    /// Sorted distinct values of `variable`.
    ///
    /// # Panics
    ///
    /// Panics if `variable >= n_variables`.
    #[inline]
    pub fn unique_values(&self, variable: usize) -> &[f64] {
        assert!(
            variable < self.n_variables,
            "Variable index {} out of bounds",
            variable
        );
        &self.unique[variable]
    }

    /// Rank of the value at `(sample, variable)` within the variable's
    /// distinct values.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn rank(&self, sample: usize, variable: usize) -> u32 {
        assert!(
            sample < self.n_samples && variable < self.n_variables,
            "Position ({}, {}) out of bounds for {}x{} index",
            sample,
            variable,
            self.n_samples,
            self.n_variables
        );
        self.ranks[variable * self.n_samples + sample]
    }

    /// All rank codes of `variable`, one per sample, as a contiguous slice.
    ///
    /// # Panics
    ///
    /// Panics if `variable >= n_variables`.
    #[inline]
    pub fn variable_ranks(&self, variable: usize) -> &[u32] {
        assert!(
            variable < self.n_variables,
            "Variable index {} out of bounds",
            variable
        );
        let start = variable * self.n_samples;
        &self.ranks[start..start + self.n_samples]
    }

    /// The distinct value of `variable` at `rank`.
    ///
    /// # Panics
    ///
    /// Panics if `variable` or `rank` is out of bounds.
    #[inline]
    pub fn value_at_rank(&self, variable: usize, rank: u32) -> f64 {
        self.unique_values(variable)[rank as usize]
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::matrix::SampleMatrix;

    fn two_variable_matrix() -> SampleMatrix<'static, f64> {
        // v0: 2, 1, 2, 9   v1: 4, 4, 4, 4
        SampleMatrix::from_vec(vec![2.0, 1.0, 2.0, 9.0, 4.0, 4.0, 4.0, 4.0], 4, 2)
    }

    #[test]
    fn ranks_recover_every_cell() {
        let matrix = two_variable_matrix();
        let index = ValueIndex::build(&matrix, Parallelism::Sequential);
        for sample in 0..matrix.n_samples() {
            for variable in 0..matrix.n_variables() {
                let recovered = index.value_at_rank(variable, index.rank(sample, variable));
                assert_eq!(recovered, matrix.get(sample, variable).unwrap());
            }
        }
    }

    #[test]
    fn unique_values_are_strictly_increasing() {
        let index = ValueIndex::build(&two_variable_matrix(), Parallelism::Sequential);
        assert_eq!(index.unique_values(0), &[1.0, 2.0, 9.0]);
        assert_eq!(index.n_unique(0), 3);
        for variable in 0..2 {
            let unique = index.unique_values(variable);
            assert!(unique.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn constant_variable_collapses_to_one_rank() {
        let index = ValueIndex::build(&two_variable_matrix(), Parallelism::Sequential);
        assert_eq!(index.n_unique(1), 1);
        assert!(index.variable_ranks(1).iter().all(|&r| r == 0));
        assert_eq!(index.max_n_unique(), 3);
    }

    #[test]
    fn missing_values_rank_last_as_one_entry() {
        let matrix =
            SampleMatrix::<f64>::from_vec(vec![3.0, f64::NAN, 1.0, f64::NAN, f64::INFINITY], 5, 1);
        let index = ValueIndex::build(&matrix, Parallelism::Sequential);

        assert_eq!(index.n_unique(0), 4); // 1, 3, inf, NaN
        let unique = index.unique_values(0);
        assert!(unique[3].is_nan());
        assert_eq!(index.rank(1, 0), 3);
        assert_eq!(index.rank(3, 0), 3);
        assert!(index.value_at_rank(0, 3).is_nan());
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let matrix = two_variable_matrix();
        let sequential = ValueIndex::build(&matrix, Parallelism::Sequential);
        let parallel = ValueIndex::build(&matrix, Parallelism::Parallel);
        assert_eq!(sequential.ranks, parallel.ranks);
        assert_eq!(sequential.unique.len(), parallel.unique.len());
        for variable in 0..2 {
            assert_eq!(
                sequential.unique_values(variable),
                parallel.unique_values(variable)
            );
        }
    }

    #[test]
    fn narrow_storage_indexes_as_f64() {
        let matrix = SampleMatrix::<u8>::from_vec(vec![2, 0, 2, 1], 4, 1);
        let index = ValueIndex::build(&matrix, Parallelism::Sequential);
        assert_eq!(index.unique_values(0), &[0.0, 1.0, 2.0]);
        assert_eq!(index.variable_ranks(0), &[2, 0, 2, 1]);
    }

    #[test]
    fn empty_data_builds_an_empty_index() {
        let matrix = SampleMatrix::<f64>::from_vec(Vec::new(), 0, 2);
        let index = ValueIndex::build(&matrix, Parallelism::Sequential);
        assert_eq!(index.n_samples(), 0);
        assert_eq!(index.n_unique(0), 0);
        assert_eq!(index.max_n_unique(), 0);
        assert_eq!(index.variable_ranks(1), &[] as &[u32]);
    }

    #[test]
    fn dataset_convenience_builds_the_same_index() {
        let dataset = Dataset::builder()
            .add_variable("x", vec![2.0, 1.0, 2.0, 9.0])
            .build()
            .unwrap();
        let index = dataset.build_index(Parallelism::Sequential);
        assert_eq!(index.unique_values(0), &[1.0, 2.0, 9.0]);
        assert_eq!(index.rank(3, 0), 2);
    }
}
