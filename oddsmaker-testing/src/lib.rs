//! Testing helpers.

use assert_float_eq::*;

pub fn assert_slice_f64_near(expected: &[f64], actual: &[f64], distance: u32) {
    assert_same_len(expected, actual);
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_f64_near!(expected, actual, distance);
        }
    }
}

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_same_len(expected, actual);
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

pub fn assert_slice_f64_absolute(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_same_len(expected, actual);
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_absolute_eq!(expected, actual, epsilon);
        }
    }
}

/// Asserts that the raw values in `probs` add up to `expected` within `epsilon`. Unlike
/// `SliceExt::booksum`, no reciprocals are taken.
pub fn assert_sum(expected: f64, probs: &[f64], epsilon: f64) {
    let sum: f64 = probs.iter().sum();
    assert!(
        (sum - expected).abs() <= epsilon,
        "expected sum {expected} ± {epsilon}, got {sum} for {probs:?}"
    );
}

fn assert_same_len(expected: &[f64], actual: &[f64]) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
}
