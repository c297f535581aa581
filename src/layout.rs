//! Memory layouts for sample-by-variable matrices.
//!
//! Layout is a type parameter, so every layout-dependent access is
//! monomorphized and there is no runtime dispatch. [`ColMajor`] is the crate
//! default: tree growers scan one variable across many samples, and
//! column-major keeps each variable contiguous.
//!
//! - [`ColMajor`]: variables are contiguous. `index = variable * n_samples + sample`
//! - [`RowMajor`]: samples are contiguous. `index = sample * n_variables + variable`

use std::iter::FusedIterator;

// Sealed so the matrix code can rely on these being the only layouts.
mod sealed {
    pub trait Sealed {}
}

/// Maps a (sample, variable) pair to an offset in the flat value buffer.
///
/// Sealed; implemented by [`ColMajor`] and [`RowMajor`] only.
pub trait Layout: sealed::Sealed + Copy + Default + std::fmt::Debug + 'static {
    /// Linear offset of `(sample, variable)` in a buffer of the given shape.
    fn index(sample: usize, variable: usize, n_samples: usize, n_variables: usize) -> usize;

    /// Distance between consecutive elements along the non-contiguous axis.
    ///
    /// - [`ColMajor`]: step between variables within one sample = `n_samples`
    /// - [`RowMajor`]: step between samples within one variable = `n_variables`
    fn stride(n_samples: usize, n_variables: usize) -> usize;

    /// Length of one contiguous run.
    ///
    /// - [`ColMajor`]: `n_samples` (one variable column)
    /// - [`RowMajor`]: `n_variables` (one sample row)
    fn contiguous_len(n_samples: usize, n_variables: usize) -> usize;
}

/// Column-major layout: each variable's values are stored contiguously.
///
/// Memory layout for 2 samples x 3 variables:
/// ```text
/// Logical:     Memory:
/// [a b c]      [a d b e c f]
/// [d e f]       ^v0 ^v1 ^v2
/// ```
///
/// - `variable_slice()` is O(1) and contiguous
/// - `sample_iter()` is strided (stride = `n_samples`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColMajor;

impl sealed::Sealed for ColMajor {}

impl Layout for ColMajor {
    #[inline]
    fn index(sample: usize, variable: usize, n_samples: usize, _n_variables: usize) -> usize {
        variable * n_samples + sample
    }

    #[inline]
    fn stride(n_samples: usize, _n_variables: usize) -> usize {
        n_samples
    }

    #[inline]
    fn contiguous_len(n_samples: usize, _n_variables: usize) -> usize {
        n_samples
    }
}

/// Row-major layout: each sample's values are stored contiguously.
///
/// Memory layout for 2 samples x 3 variables:
/// ```text
/// Logical:     Memory:
/// [a b c]      [a b c d e f]
/// [d e f]       ^-s0-^ ^-s1-^
/// ```
///
/// - `sample_slice()` is O(1) and contiguous
/// - `variable_iter()` is strided (stride = `n_variables`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowMajor;

impl sealed::Sealed for RowMajor {}

impl Layout for RowMajor {
    #[inline]
    fn index(sample: usize, variable: usize, _n_samples: usize, n_variables: usize) -> usize {
        sample * n_variables + variable
    }

    #[inline]
    fn stride(_n_samples: usize, n_variables: usize) -> usize {
        n_variables
    }

    #[inline]
    fn contiguous_len(_n_samples: usize, n_variables: usize) -> usize {
        n_variables
    }
}

/// Iterator over buffer elements at a fixed stride.
///
/// Walks the non-contiguous axis of a matrix: one sample in a column-major
/// buffer, or one variable in a row-major one.
#[derive(Debug, Clone)]
pub struct StridedIter<'a, T> {
    data: &'a [T],
    pos: usize,
    stride: usize,
    remaining: usize,
}

impl<'a, T> StridedIter<'a, T> {
    /// Iterator over `count` elements of `data`, starting at `start` and
    /// advancing by `stride`.
    #[inline]
    pub fn new(data: &'a [T], start: usize, stride: usize, count: usize) -> Self {
        Self {
            data,
            pos: start,
            stride,
            remaining: count,
        }
    }
}

impl<'a, T> Iterator for StridedIter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = &self.data[self.pos];
        self.pos += self.stride;
        self.remaining -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for StridedIter<'_, T> {}
impl<T> FusedIterator for StridedIter<'_, T> {}
