//! Dataset assembly and statistics tests.
//!
//! End-to-end coverage of the builder, schema queries, per-variable
//! statistics over sample subsets, and narrow storage types.

use rstest::rstest;

use understory::error::DataError;
use understory::testing::{assert_values_close, random_matrix, DEFAULT_TOLERANCE};
use understory::{
    ColMajor, Dataset, Parallelism, RowMajor, SampleMatrix, Schema, VariableMeta, VariableType,
};

// =============================================================================
// Builder
// =============================================================================

#[test]
fn builder_assembles_column_major() {
    let dataset = Dataset::builder()
        .add_variable("age", vec![31.0, 45.0, 28.0])
        .add_variable("height", vec![1.71, 1.80, 1.65])
        .build()
        .unwrap();

    assert_eq!(dataset.n_samples(), 3);
    assert_eq!(dataset.n_variables(), 2);
    assert_eq!(dataset.variable_values(0), &[31.0, 45.0, 28.0]);
    assert_eq!(dataset.variable_values(1), &[1.71, 1.80, 1.65]);
    assert_eq!(dataset.schema().variable_index("height"), Some(1));
    assert!(!dataset.is_borrowed());
}

#[test]
fn builder_rejects_empty() {
    let result = Dataset::<f64>::builder().build();
    assert!(matches!(result, Err(DataError::EmptyDataset)));
}

#[test]
fn builder_rejects_ragged_columns() {
    let result = Dataset::builder()
        .add_variable("a", vec![1.0, 2.0, 3.0])
        .add_variable("b", vec![1.0, 2.0])
        .build();

    let err = result.unwrap_err();
    assert!(matches!(err, DataError::ShapeMismatch { expected: 3, got: 2, .. }));
    assert!(err.to_string().contains("`b`"), "error names the offending variable: {err}");
}

#[test]
fn builder_rejects_duplicate_names() {
    let result = Dataset::builder()
        .add_variable("x", vec![1.0])
        .add_variable("x", vec![2.0])
        .build();

    assert!(matches!(result, Err(DataError::DuplicateVariable(name)) if name == "x"));
}

#[test]
fn builder_factor_columns_are_marked() {
    let dataset = Dataset::builder()
        .add_variable("age", vec![31.0, 45.0])
        .add_factor("color", vec![1.0, 3.0])
        .build()
        .unwrap();

    assert!(!dataset.schema().is_factor(0));
    assert!(dataset.schema().is_factor(1));
    assert!(dataset.schema().has_factors());
}

// =============================================================================
// Construction From Parts
// =============================================================================

#[test]
fn from_slice_rejects_wrong_length() {
    let values = vec![1.0, 2.0, 3.0];
    let result = Dataset::from_slice(&values, 2, 2);
    assert!(matches!(
        result,
        Err(DataError::ShapeMismatch { expected: 4, got: 3, .. })
    ));
}

#[test]
fn new_rejects_schema_arity_mismatch() {
    let matrix = SampleMatrix::<f64>::from_vec(vec![0.0; 6], 3, 2);
    let schema = Schema::from_variables(vec![VariableMeta::numeric(); 3]).unwrap();

    let result = Dataset::new(matrix, schema);
    assert!(matches!(
        result,
        Err(DataError::SchemaMismatch { n_variables: 2, n_meta: 3 })
    ));
}

#[test]
fn mark_factors_validates_before_mutating() {
    let mut dataset = Dataset::builder()
        .add_variable("a", vec![1.0])
        .add_variable("b", vec![2.0])
        .build()
        .unwrap();

    let result = dataset.mark_factors(&["a", "nope"]);
    assert!(matches!(result, Err(DataError::UnknownVariable(name)) if name == "nope"));
    // Nothing was marked: the failed call must not leave `a` half-converted.
    assert!(!dataset.schema().is_factor(0));

    dataset.mark_factors(&["a"]).unwrap();
    assert_eq!(dataset.schema().variable_type(0), VariableType::Factor);
    assert_eq!(dataset.schema().variable_type(1), VariableType::Numeric);
}

// =============================================================================
// Column Statistics
// =============================================================================

#[rstest]
#[case::all_samples(vec![0, 1, 2, 3], Some((-1.0, 7.0)))]
#[case::skips_missing(vec![0, 1, 3], Some((3.0, 7.0)))]
#[case::only_missing(vec![1], None)]
#[case::empty_subset(vec![], None)]
fn min_max_over_subset(#[case] samples: Vec<usize>, #[case] expected: Option<(f64, f64)>) {
    let dataset = Dataset::builder()
        .add_variable("x", vec![3.0, f64::NAN, -1.0, 7.0])
        .build()
        .unwrap();

    assert_eq!(dataset.min_max(0, &samples), expected);
}

#[rstest]
#[case::full(vec![0, 1, 2, 3, 4], vec![1.0, 2.0, 5.0])]
#[case::subset_collapses_duplicates(vec![0, 2], vec![2.0])]
#[case::missing_excluded(vec![1, 4], vec![1.0])]
fn sorted_unique_values_over_subset(#[case] samples: Vec<usize>, #[case] expected: Vec<f64>) {
    let dataset = Dataset::builder()
        .add_variable("x", vec![2.0, 1.0, 2.0, 5.0, f64::NAN])
        .build()
        .unwrap();

    let unique = dataset.sorted_unique_values(0, &samples);
    assert_values_close(&unique, &expected, DEFAULT_TOLERANCE, "unique values");
}

#[test]
fn signed_zeros_are_distinct_values() {
    let dataset = Dataset::builder()
        .add_variable("x", vec![-0.0, 0.0, 1.0])
        .build()
        .unwrap();

    let unique = dataset.sorted_unique_values(0, &[0, 1, 2]);
    assert_eq!(unique.len(), 3);
    assert!(unique[0] == 0.0 && unique[0].is_sign_negative());
    assert!(unique[1] == 0.0 && unique[1].is_sign_positive());
    assert_eq!(unique[2], 1.0);

    // The index sees the same three distinct values.
    let index = dataset.build_index(Parallelism::Sequential);
    assert_eq!(index.n_unique(0), unique.len());
    assert_eq!(index.rank(0, 0), 0);
    assert_eq!(index.rank(1, 0), 1);
}

#[test]
fn has_missing_detects_nan() {
    let clean = Dataset::builder()
        .add_variable("x", vec![1.0, 2.0])
        .build()
        .unwrap();
    assert!(!clean.has_missing());

    let holes = Dataset::builder()
        .add_variable("x", vec![1.0, f64::NAN])
        .build()
        .unwrap();
    assert!(holes.has_missing());
}

// =============================================================================
// Narrow Storage
// =============================================================================

#[rstest]
#[case::fits(2.0, true)]
#[case::zero(0.0, true)]
#[case::max(255.0, true)]
#[case::fractional(2.5, false)]
#[case::too_large(256.0, false)]
#[case::negative(-1.0, false)]
#[case::nan(f64::NAN, false)]
fn byte_storage_gates_writes(#[case] value: f64, #[case] ok: bool) {
    let matrix = SampleMatrix::<u8>::zeros(2, 1);
    let mut dataset = Dataset::from_matrix(matrix);

    let result = dataset.set_from_f64(0, 0, value);
    assert_eq!(result.is_ok(), ok, "value {value} storable in u8: expected {ok}");
    if !ok {
        assert!(matches!(
            result,
            Err(DataError::ValueNotStorable { variable: 0, .. })
        ));
    }
}

#[test]
fn byte_storage_widens_to_f64_on_read() {
    let mut dataset = Dataset::from_matrix(SampleMatrix::<u8>::zeros(3, 1));
    dataset.set_from_f64(0, 0, 7.0).unwrap();
    dataset.set_from_f64(1, 0, 200.0).unwrap();

    assert_eq!(dataset.value(0, 0), 7.0);
    assert_eq!(dataset.value(1, 0), 200.0);
    assert_eq!(dataset.value(2, 0), 0.0);
    assert_eq!(dataset.sorted_unique_values(0, &[0, 1, 2]), vec![0.0, 7.0, 200.0]);
}

#[test]
fn write_out_of_bounds_is_an_error() {
    let mut dataset = Dataset::builder()
        .add_variable("x", vec![1.0, 2.0])
        .build()
        .unwrap();

    let result = dataset.set_from_f64(2, 0, 0.0);
    assert!(matches!(
        result,
        Err(DataError::OutOfBounds { sample: 2, variable: 0, .. })
    ));
}

// =============================================================================
// Layout Round Trips
// =============================================================================

#[test]
fn layout_conversion_preserves_every_cell() {
    let matrix = random_matrix(7, 4, 99, -5.0, 5.0);

    let row_major: SampleMatrix<f64, RowMajor> = matrix.to_layout();
    let back: SampleMatrix<f64, ColMajor> = row_major.to_layout();

    assert_values_close(back.as_slice(), matrix.as_slice(), DEFAULT_TOLERANCE, "round trip");
    for sample in 0..7 {
        for variable in 0..4 {
            assert_eq!(row_major.get(sample, variable), matrix.get(sample, variable));
        }
    }
}

// =============================================================================
// Index Smoke
// =============================================================================

#[test]
fn built_index_ranks_recover_values() {
    let dataset = Dataset::builder()
        .add_variable("x", vec![2.0, 1.0, 2.0, 9.0])
        .add_variable("y", vec![0.5, 0.5, 0.5, 0.5])
        .build()
        .unwrap();

    let index = dataset.build_index(Parallelism::Sequential);
    assert_eq!(index.n_unique(0), 3);
    assert_eq!(index.n_unique(1), 1);
    assert_eq!(index.max_n_unique(), 3);

    for sample in 0..4 {
        for variable in 0..2 {
            let rank = index.rank(sample, variable);
            assert_eq!(index.value_at_rank(variable, rank), dataset.value(sample, variable));
        }
    }
}
