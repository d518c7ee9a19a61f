//! Assertion utilities for testing.
//!
//! Floating-point comparisons for totals and grids.

use ndarray::{ArrayBase, Data, Dimension};

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f32 = 1e-4;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f32, expected: f32, epsilon: Option<f32>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that two arrays have the same shape and approximately equal elements.
///
/// # Panics
///
/// Panics on a shape mismatch or if any element-wise comparison fails.
pub fn assert_array_approx_eq<S1, S2, D>(
    actual: &ArrayBase<S1, D>,
    expected: &ArrayBase<S2, D>,
    epsilon: Option<f32>,
) where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
    D: Dimension,
{
    assert_eq!(
        actual.shape(),
        expected.shape(),
        "Arrays have different shapes"
    );

    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    for ((index, a), e) in actual.indexed_iter().zip(expected.iter()) {
        let diff = (a - e).abs();
        assert!(
            diff <= eps,
            "Arrays differ at {:?}: actual = {}, expected = {}, diff = {}, epsilon = {}",
            index,
            a,
            e,
            diff,
            eps
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.00001, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    fn test_assert_array_approx_eq() {
        assert_array_approx_eq(&array![[1.0, 2.0], [3.0, 4.0]], &array![[1.0, 2.0], [3.0, 4.00001]], None);
    }
}
