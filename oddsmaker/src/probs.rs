//! Utilities for working with probabilities.

pub trait SliceExt {
    fn sum(&self) -> f64;
    fn normalise(&mut self, target: f64) -> f64;
    fn scale(&mut self, factor: f64);
    fn invert(&self) -> Vec<f64>;
    fn booksum(&self) -> f64;
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Scales the elements so that they add up to `target`, returning the sum prior to scaling.
    fn normalise(&mut self, target: f64) -> f64 {
        let sum = self.sum();
        self.scale(target / sum);
        sum
    }

    fn scale(&mut self, factor: f64) {
        for element in self {
            *element *= factor;
        }
    }

    /// Reciprocals of the elements. Converts between prices and implied probabilities in
    /// either direction.
    fn invert(&self) -> Vec<f64> {
        self.iter().map(|element| 1.0 / element).collect()
    }

    /// Sum of the implied probabilities of a slice of prices.
    fn booksum(&self) -> f64 {
        self.iter().map(|price| 1.0 / price).sum()
    }
}

/// Clamps `value` to a closed interval given as a `(min, max)` pair. Unlike [`f64::clamp`],
/// never panics on a malformed interval; `min` takes precedence.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    f64::max(min, f64::min(max, value))
}
