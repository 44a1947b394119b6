//! Poisson probability mass functions.

use crate::factorial::Factorial;

/// P(X = k) for X ~ Poisson(λ). A non-positive `lambda` is treated as a distribution
/// degenerate at zero.
#[inline]
pub fn univariate(k: u8, lambda: f64, factorial: &impl Factorial) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    lambda.powi(k as i32) * f64::exp(-lambda) / factorial.get(k) as f64
}

/// The PMF of Poisson(λ) over `0..=max_k`. The tail beyond `max_k` is not included, so the
/// entries sum to slightly less than 1.
pub fn truncated(lambda: f64, max_k: u8, factorial: &impl Factorial) -> Vec<f64> {
    (0..=max_k).map(|k| univariate(k, lambda, factorial)).collect()
}

/// Probability that the sum of two independent Poisson variables, each truncated to
/// `0..=max_k`, strictly exceeds `line`.
pub fn total_over(
    lambda_1: f64,
    lambda_2: f64,
    line: f64,
    max_k: u8,
    factorial: &impl Factorial,
) -> f64 {
    let pmf_1 = truncated(lambda_1, max_k, factorial);
    let pmf_2 = truncated(lambda_2, max_k, factorial);
    let mut over = 0.0;
    for (k_1, p_1) in pmf_1.iter().enumerate() {
        for (k_2, p_2) in pmf_2.iter().enumerate() {
            if (k_1 + k_2) as f64 > line {
                over += p_1 * p_2;
            }
        }
    }
    over
}
