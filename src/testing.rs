//! Testing utilities.
//!
//! Deterministic data generators and assertion helpers shared by unit
//! tests, integration tests, and benchmarks. Generators are seeded, so a
//! failing case reproduces exactly.

use rand::prelude::*;

use crate::dataset::Dataset;
use crate::matrix::SampleMatrix;

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for double comparisons in tests.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

// =============================================================================
// Data Generators
// =============================================================================

/// Deterministic values in `[min, max)`.
pub fn random_values(n: usize, seed: u64, min: f64, max: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(min..max)).collect()
}

/// Deterministic column-major matrix with values in `[min, max)`.
pub fn random_matrix(
    n_samples: usize,
    n_variables: usize,
    seed: u64,
    min: f64,
    max: f64,
) -> SampleMatrix<'static, f64> {
    SampleMatrix::from_vec(
        random_values(n_samples * n_variables, seed, min, max),
        n_samples,
        n_variables,
    )
}

/// Deterministic dataset with numeric variables named `var_0`, `var_1`, ...
pub fn random_dataset(n_samples: usize, n_variables: usize, seed: u64) -> Dataset<'static> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = Dataset::builder();
    for variable in 0..n_variables {
        let column = (0..n_samples).map(|_| rng.random_range(-10.0..10.0)).collect();
        builder = builder.add_variable(format!("var_{}", variable), column);
    }
    builder.build().expect("generated dataset is well formed")
}

/// Replace roughly `fraction` of `values` with NaN, deterministically.
pub fn sprinkle_missing(values: &mut [f64], fraction: f64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for value in values.iter_mut() {
        if rng.random::<f64>() < fraction {
            *value = f64::NAN;
        }
    }
}

// =============================================================================
// Assertions
// =============================================================================

/// Assert that two f64 slices are approximately equal element-wise.
///
/// Missing values compare equal to each other: a NaN in `actual` matches a
/// NaN in `expected`.
///
/// # Panics
///
/// Panics if lengths differ or any element differs by more than tolerance.
pub fn assert_values_close(actual: &[f64], expected: &[f64], tolerance: f64, context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        if a.is_nan() && e.is_nan() {
            continue;
        }
        let diff = (a - e).abs();
        assert!(
            diff <= tolerance,
            "{context}[{i}]: {a} ≠ {e} (diff={diff}, tolerance={tolerance})"
        );
    }
}
