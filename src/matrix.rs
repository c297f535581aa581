//! Dense sample-by-variable matrix with explicit buffer ownership.
//!
//! # Overview
//!
//! [`SampleMatrix`] is the storage unit handed to forest growers: `n_samples`
//! rows of `n_variables` values in one flat buffer. The buffer is a
//! [`ValueBuffer`], so a matrix either owns its allocation or borrows caller
//! memory; which one is fixed by the constructor, and drop glue releases only
//! owned buffers. Layout is a type parameter ([`ColMajor`] by default, since
//! split finding scans one variable across many samples) and every
//! layout-dependent access is monomorphized.
//!
//! # Writes
//!
//! Mutation goes through copy-on-write: the first write to a borrowed matrix
//! copies the buffer into an owned one. Caller memory is never written.
//!
//! # Example
//!
//! ```
//! use understory::{SampleMatrix, RowMajor};
//!
//! // Owned, column-major (default): variable 0 first, then variable 1.
//! let owned = SampleMatrix::<f64>::from_vec(vec![1.0, 3.0, 2.0, 4.0], 2, 2);
//! assert_eq!(owned.variable_slice(0), &[1.0, 3.0]);
//! assert!(owned.is_owned());
//!
//! // Borrowed from caller memory; the caller keeps ownership.
//! let backing = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let borrowed = SampleMatrix::<f64, RowMajor>::from_slice(&backing, 2, 3);
//! assert_eq!(borrowed.sample_slice(1), &[4.0, 5.0, 6.0]);
//! assert!(borrowed.is_borrowed());
//! ```

use crate::element::Element;
use crate::layout::{ColMajor, Layout, RowMajor, StridedIter};
use crate::storage::ValueBuffer;
use std::marker::PhantomData;

// =============================================================================
// ValueAccessor
// =============================================================================

/// Read-only, double-precision view of tabular training data.
///
/// Tree growers consume this instead of a concrete matrix type, so they work
/// unchanged over any storage precision and either layout.
pub trait ValueAccessor {
    /// Value at `(sample, variable)`, widened to `f64`.
    ///
    /// Returns NaN for out-of-bounds positions and for missing values.
    fn value(&self, sample: usize, variable: usize) -> f64;

    /// Number of samples (rows).
    fn n_samples(&self) -> usize;

    /// Number of variables (columns).
    fn n_variables(&self) -> usize;
}

// =============================================================================
// SampleMatrix
// =============================================================================

/// Dense matrix of observation values with owned or borrowed storage.
///
/// # Generic Parameters
///
/// - `T`: storage element (default `f64`; see [`Element`] for the narrower modes)
/// - `L`: memory layout (default [`ColMajor`])
///
/// # Ownership
///
/// The backing [`ValueBuffer`] records whether the matrix owns its buffer.
/// [`from_vec`](SampleMatrix::from_vec) and [`zeros`](SampleMatrix::zeros)
/// produce owning matrices whose buffer is released exactly once on drop;
/// [`from_slice`](SampleMatrix::from_slice) produces a borrowing matrix that
/// releases nothing. There is no flag to keep in sync and no way to construct
/// a matrix that frees memory it does not own.
///
/// # Missing Values
///
/// Float-backed matrices encode missing observations as NaN; byte-backed
/// matrices cannot hold missing values.
#[derive(Debug, Clone)]
pub struct SampleMatrix<'a, T = f64, L: Layout = ColMajor> {
    values: ValueBuffer<'a, T>,
    n_samples: usize,
    n_variables: usize,
    _layout: PhantomData<L>,
}

// =============================================================================
// Constructors (layout-generic)
// =============================================================================

impl<T, L: Layout> SampleMatrix<'static, T, L> {
    /// Create an owning matrix from a flat `Vec` in layout order.
    ///
    /// - `ColMajor`: `[v0s0, v0s1, ..., v1s0, v1s1, ...]`
    /// - `RowMajor`: `[s0v0, s0v1, ..., s1v0, s1v1, ...]`
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != n_samples * n_variables`.
    pub fn from_vec(values: Vec<T>, n_samples: usize, n_variables: usize) -> Self {
        assert_eq!(
            values.len(),
            n_samples * n_variables,
            "Value buffer length {} does not match {} samples x {} variables",
            values.len(),
            n_samples,
            n_variables
        );
        Self {
            values: ValueBuffer::from_vec(values),
            n_samples,
            n_variables,
            _layout: PhantomData,
        }
    }
}

impl<T: Element, L: Layout> SampleMatrix<'static, T, L> {
    /// Allocate an owning matrix of the given shape, filled with zeros.
    ///
    /// This is the reserve step for loaders that fill cells afterwards with
    /// [`set`](SampleMatrix::set) or
    /// [`Dataset::set_from_f64`](crate::Dataset::set_from_f64).
    pub fn zeros(n_samples: usize, n_variables: usize) -> Self {
        Self {
            values: ValueBuffer::from_vec(vec![T::default(); n_samples * n_variables]),
            n_samples,
            n_variables,
            _layout: PhantomData,
        }
    }
}

impl<'a, T, L: Layout> SampleMatrix<'a, T, L> {
    /// Create a borrowing matrix over caller memory, without copying.
    ///
    /// The caller keeps ownership of `values`; dropping the matrix releases
    /// nothing.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != n_samples * n_variables`.
    pub fn from_slice(values: &'a [T], n_samples: usize, n_variables: usize) -> Self {
        assert_eq!(
            values.len(),
            n_samples * n_variables,
            "Value buffer length {} does not match {} samples x {} variables",
            values.len(),
            n_samples,
            n_variables
        );
        Self {
            values: ValueBuffer::from_slice(values),
            n_samples,
            n_variables,
            _layout: PhantomData,
        }
    }

    /// Create a matrix from an existing buffer, preserving its ownership mode.
    ///
    /// # Panics
    ///
    /// Panics if `buffer.len() != n_samples * n_variables`.
    pub fn new(buffer: ValueBuffer<'a, T>, n_samples: usize, n_variables: usize) -> Self {
        assert_eq!(
            buffer.len(),
            n_samples * n_variables,
            "Value buffer length {} does not match {} samples x {} variables",
            buffer.len(),
            n_samples,
            n_variables
        );
        Self {
            values: buffer,
            n_samples,
            n_variables,
            _layout: PhantomData,
        }
    }
}

/// An empty owning matrix: no samples, no variables, nothing to release.
impl<T, L: Layout> Default for SampleMatrix<'_, T, L> {
    fn default() -> Self {
        Self {
            values: ValueBuffer::default(),
            n_samples: 0,
            n_variables: 0,
            _layout: PhantomData,
        }
    }
}

// =============================================================================
// Accessors (layout-generic)
// =============================================================================

impl<'a, T, L: Layout> SampleMatrix<'a, T, L> {
    /// Number of samples (rows).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of variables (columns).
    #[inline]
    pub fn n_variables(&self) -> usize {
        self.n_variables
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The flat value buffer in layout order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.values.as_slice()
    }

    /// `true` if this matrix owns its buffer and will release it on drop.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.values.is_owned()
    }

    /// `true` if this matrix borrows caller memory.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        self.values.is_borrowed()
    }

    /// Value at `(sample, variable)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, sample: usize, variable: usize) -> Option<T>
    where
        T: Copy,
    {
        if sample >= self.n_samples || variable >= self.n_variables {
            return None;
        }
        let idx = L::index(sample, variable, self.n_samples, self.n_variables);
        Some(self.values.as_slice()[idx])
    }

    /// Write `value` at `(sample, variable)`.
    ///
    /// A borrowing matrix copies its buffer into an owned one on the first
    /// write; the caller's memory is never modified.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn set(&mut self, sample: usize, variable: usize, value: T)
    where
        T: Clone,
    {
        assert!(
            sample < self.n_samples && variable < self.n_variables,
            "Position ({}, {}) out of bounds for {}x{} matrix",
            sample,
            variable,
            self.n_samples,
            self.n_variables
        );
        let idx = L::index(sample, variable, self.n_samples, self.n_variables);
        self.values.to_mut()[idx] = value;
    }

    /// Mutable access to the flat buffer, promoting a borrowed buffer to an
    /// owned copy first.
    #[inline]
    pub fn to_mut_slice(&mut self) -> &mut [T]
    where
        T: Clone,
    {
        self.values.to_mut()
    }

    /// Convert into a matrix that owns its buffer, copying if borrowed.
    pub fn into_owned(self) -> SampleMatrix<'static, T, L>
    where
        T: Clone,
    {
        SampleMatrix {
            values: self.values.into_owned(),
            n_samples: self.n_samples,
            n_variables: self.n_variables,
            _layout: PhantomData,
        }
    }

    /// Copy into a new owning matrix with a different layout. O(n).
    ///
    /// # Example
    ///
    /// ```
    /// use understory::{SampleMatrix, ColMajor, RowMajor};
    ///
    /// let cm = SampleMatrix::<f64>::from_vec(vec![1.0, 3.0, 2.0, 4.0], 2, 2);
    /// let rm: SampleMatrix<f64, RowMajor> = cm.to_layout();
    /// assert_eq!(rm.sample_slice(0), &[1.0, 2.0]);
    /// ```
    pub fn to_layout<L2: Layout>(&self) -> SampleMatrix<'static, T, L2>
    where
        T: Copy,
    {
        let src = self.values.as_slice();
        let mut values = src.to_vec();
        for sample in 0..self.n_samples {
            for variable in 0..self.n_variables {
                let from = L::index(sample, variable, self.n_samples, self.n_variables);
                let to = L2::index(sample, variable, self.n_samples, self.n_variables);
                values[to] = src[from];
            }
        }
        SampleMatrix {
            values: ValueBuffer::from_vec(values),
            n_samples: self.n_samples,
            n_variables: self.n_variables,
            _layout: PhantomData,
        }
    }
}

// =============================================================================
// Column-major specific methods
// =============================================================================

impl<'a, T> SampleMatrix<'a, T, ColMajor> {
    /// One variable's values across all samples, as a contiguous slice. O(1).
    ///
    /// # Panics
    ///
    /// Panics if `variable >= n_variables`.
    #[inline]
    pub fn variable_slice(&self, variable: usize) -> &[T] {
        assert!(
            variable < self.n_variables,
            "Variable index {} out of bounds",
            variable
        );
        let start = variable * self.n_samples;
        &self.values.as_slice()[start..start + self.n_samples]
    }

    /// Mutable slice of one variable, promoting a borrowed buffer first.
    #[inline]
    pub fn variable_slice_mut(&mut self, variable: usize) -> &mut [T]
    where
        T: Clone,
    {
        assert!(
            variable < self.n_variables,
            "Variable index {} out of bounds",
            variable
        );
        let start = variable * self.n_samples;
        let end = start + self.n_samples;
        &mut self.values.to_mut()[start..end]
    }

    /// Iterate over one sample's values (strided access).
    ///
    /// Slower than `variable_slice()`; the values sit `n_samples` apart.
    #[inline]
    pub fn sample_iter(&self, sample: usize) -> StridedIter<'_, T> {
        assert!(
            sample < self.n_samples,
            "Sample index {} out of bounds",
            sample
        );
        StridedIter::new(
            self.values.as_slice(),
            sample,
            self.n_samples,
            self.n_variables,
        )
    }

    /// Copy one sample's values into `buf` (strided gather).
    ///
    /// # Panics
    ///
    /// Panics if `sample` is out of bounds or `buf` is shorter than
    /// `n_variables`.
    pub fn copy_sample(&self, sample: usize, buf: &mut [T])
    where
        T: Copy,
    {
        assert!(
            sample < self.n_samples,
            "Sample index {} out of bounds",
            sample
        );
        assert!(
            buf.len() >= self.n_variables,
            "Buffer too small: {} < {}",
            buf.len(),
            self.n_variables
        );
        let values = self.values.as_slice();
        for (variable, dst) in buf[..self.n_variables].iter_mut().enumerate() {
            let idx = ColMajor::index(sample, variable, self.n_samples, self.n_variables);
            *dst = values[idx];
        }
    }
}

// =============================================================================
// Row-major specific methods
// =============================================================================

impl<'a, T> SampleMatrix<'a, T, RowMajor> {
    /// One sample's values as a contiguous slice. O(1).
    ///
    /// # Panics
    ///
    /// Panics if `sample >= n_samples`.
    #[inline]
    pub fn sample_slice(&self, sample: usize) -> &[T] {
        assert!(
            sample < self.n_samples,
            "Sample index {} out of bounds",
            sample
        );
        let start = sample * self.n_variables;
        &self.values.as_slice()[start..start + self.n_variables]
    }

    /// Mutable slice of one sample, promoting a borrowed buffer first.
    #[inline]
    pub fn sample_slice_mut(&mut self, sample: usize) -> &mut [T]
    where
        T: Clone,
    {
        assert!(
            sample < self.n_samples,
            "Sample index {} out of bounds",
            sample
        );
        let start = sample * self.n_variables;
        let end = start + self.n_variables;
        &mut self.values.to_mut()[start..end]
    }

    /// Iterate over one variable's values (strided access).
    #[inline]
    pub fn variable_iter(&self, variable: usize) -> StridedIter<'_, T> {
        assert!(
            variable < self.n_variables,
            "Variable index {} out of bounds",
            variable
        );
        StridedIter::new(
            self.values.as_slice(),
            variable,
            self.n_variables,
            self.n_samples,
        )
    }

    /// Copy one sample's values into `buf`. Contiguous, so a plain memcpy.
    ///
    /// # Panics
    ///
    /// Panics if `sample` is out of bounds or `buf` is shorter than
    /// `n_variables`.
    pub fn copy_sample(&self, sample: usize, buf: &mut [T])
    where
        T: Copy,
    {
        assert!(
            buf.len() >= self.n_variables,
            "Buffer too small: {} < {}",
            buf.len(),
            self.n_variables
        );
        buf[..self.n_variables].copy_from_slice(self.sample_slice(sample));
    }
}

// =============================================================================
// Missing values
// =============================================================================

impl<T: Element, L: Layout> SampleMatrix<'_, T, L> {
    /// `true` if any cell holds a missing value.
    pub fn has_missing(&self) -> bool {
        self.values.as_slice().iter().any(|&x| x.is_missing())
    }

    /// Fraction of cells holding observed (non-missing) values.
    ///
    /// An empty matrix reports density 1.0.
    pub fn density(&self) -> f64 {
        if self.n_samples == 0 || self.n_variables == 0 {
            return 1.0;
        }
        let total = self.n_samples * self.n_variables;
        let observed = self
            .values
            .as_slice()
            .iter()
            .filter(|&&x| !x.is_missing())
            .count();
        observed as f64 / total as f64
    }
}

// =============================================================================
// ValueAccessor implementation
// =============================================================================

impl<T: Element, L: Layout> ValueAccessor for SampleMatrix<'_, T, L> {
    #[inline]
    fn value(&self, sample: usize, variable: usize) -> f64 {
        self.get(sample, variable).map(T::to_f64).unwrap_or(f64::NAN)
    }

    #[inline]
    fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[inline]
    fn n_variables(&self) -> usize {
        self.n_variables
    }
}

// =============================================================================
// Tests
// =============================================================================
