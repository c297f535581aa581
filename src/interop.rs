//! ndarray conversions.
//!
//! Bridges [`SampleMatrix`] to the `ndarray` ecosystem in both directions.
//! Arrays are sample-major (`[n_samples, n_variables]`); a standard-layout
//! view converts without copying, and a matrix exposes itself as an
//! `ArrayView2` regardless of its own layout.

use ndarray::{Array2, ArrayView2, ShapeBuilder};

use crate::layout::{ColMajor, RowMajor};
use crate::matrix::SampleMatrix;

impl<T: Copy> SampleMatrix<'static, T, RowMajor> {
    /// Take ownership of a sample-major array.
    ///
    /// Standard-layout arrays move their buffer in; anything else (sliced,
    /// reversed, F-order) is repacked in logical order.
    pub fn from_array(array: Array2<T>) -> Self {
        let (n_samples, n_variables) = array.dim();
        let len = n_samples * n_variables;
        if array.is_standard_layout() {
            let (mut values, offset) = array.into_raw_vec_and_offset();
            if let Some(offset) = offset {
                if offset > 0 {
                    values.drain(..offset);
                }
            }
            values.truncate(len);
            Self::from_vec(values, n_samples, n_variables)
        } else {
            let values: Vec<T> = array.iter().copied().collect();
            Self::from_vec(values, n_samples, n_variables)
        }
    }
}

impl<'a, T> SampleMatrix<'a, T, RowMajor> {
    /// Borrow a standard-layout view without copying.
    ///
    /// Returns `None` if the view is not contiguous in sample-major order;
    /// callers can fall back to [`from_array`](SampleMatrix::from_array) on
    /// an owned copy.
    pub fn from_array_view(view: ArrayView2<'a, T>) -> Option<Self> {
        let (n_samples, n_variables) = view.dim();
        let values = view.to_slice()?;
        Some(Self::from_slice(values, n_samples, n_variables))
    }

    /// View this matrix as a sample-major ndarray. Zero-copy.
    pub fn as_array_view(&self) -> ArrayView2<'_, T> {
        ArrayView2::from_shape((self.n_samples(), self.n_variables()), self.as_slice())
            .expect("buffer length was validated at construction")
    }

    /// Copy into an owned sample-major array.
    pub fn to_array(&self) -> Array2<T>
    where
        T: Clone,
    {
        self.as_array_view().to_owned()
    }
}

impl<'a, T> SampleMatrix<'a, T, ColMajor> {
    /// View this matrix as a sample-major ndarray. Zero-copy; the view
    /// carries column-major strides.
    pub fn as_array_view(&self) -> ArrayView2<'_, T> {
        ArrayView2::from_shape(
            (self.n_samples(), self.n_variables()).f(),
            self.as_slice(),
        )
        .expect("buffer length was validated at construction")
    }

    /// Copy into an owned sample-major array.
    pub fn to_array(&self) -> Array2<T>
    where
        T: Clone,
    {
        self.as_array_view().to_owned()
    }
}
