//! Helper functions for integration tests

use stencil_rs::field::Field;
use stencil_rs::grid::Geometry;

/// Assert that two fields have the same shape and close values
pub fn assert_fields_close(actual: &Field, expected: &Field, tolerance: f64, message: &str) {
    assert_eq!(actual.shape(), expected.shape(), "{}: shape mismatch", message);

    for (i, (&a, &e)) in actual.data().iter().zip(expected.data().iter()).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff < tolerance,
            "{}: element {} differs by {} (tolerance {})",
            message, i, diff, tolerance
        );
    }
}

/// Root-mean-square difference between two fields
pub fn compute_l2_error(actual: &Field, expected: &Field) -> f64 {
    let count = actual.data().len();
    if count == 0 {
        return 0.0;
    }
    let sum_squared_diff: f64 = actual
        .data()
        .iter()
        .zip(expected.data().iter())
        .map(|(a, e)| (a - e).powi(2))
        .sum();
    (sum_squared_diff / count as f64).sqrt()
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// `Σ V_n f_n` for a scalar field
pub fn volume_weighted_sum(geometry: &Geometry, field: &Field) -> f64 {
    geometry.integrate(field).unwrap()[0]
}
