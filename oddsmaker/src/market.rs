//! Framing of a market's prices from its outcome probabilities under a bookmaker overround,
//! and the inverse: recovering probabilities and the overround from quoted prices.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::probs::SliceExt;

pub type PriceBounds = RangeInclusive<f64>;

/// The overround applied uniformly across a market's outcomes, expressed as the booksum of a
/// unit-probability market; e.g., 1.05 for a 5% margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overround {
    pub value: f64,
}
impl Overround {
    pub fn fair() -> Self {
        Self { value: 1.0 }
    }

    pub fn from_margin(margin: f64) -> Self {
        Self {
            value: 1.0 + margin,
        }
    }

    pub fn margin(&self) -> f64 {
        self.value - 1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub probs: Vec<f64>,
    pub prices: Vec<f64>,
    pub overround: Overround,
}
impl Market {
    /// Infers the probabilities and the overround from a set of `prices`, where the fair
    /// (margin-free) probabilities are known to sum to `fair_sum`.
    pub fn fit(prices: Vec<f64>, fair_sum: f64) -> Self {
        let mut probs = prices.invert();
        let overround = probs.normalise(fair_sum) / fair_sum;
        Self {
            probs,
            prices,
            overround: Overround { value: overround },
        }
    }

    /// Derives prices from `probs` by dividing each fair price by the overround, then capping
    /// to `bounds`.
    pub fn frame(overround: &Overround, probs: Vec<f64>, bounds: &PriceBounds) -> Self {
        let prices = probs
            .iter()
            .map(|prob| multiply_capped(1.0 / prob, overround.value, bounds))
            .collect();
        Self {
            probs,
            prices,
            overround: *overround,
        }
    }

    /// Rounds every price to `decimals` places.
    pub fn round_prices(&mut self, decimals: u8) {
        for price in &mut self.prices {
            *price = round(*price, decimals);
        }
    }

    pub fn booksum(&self) -> f64 {
        self.prices.booksum()
    }
}

/// Divides `fair_price` by `overround`, capping the result to `bounds`. A non-finite
/// quotient, as produced by a zero probability, is capped to the upper bound.
pub fn multiply_capped(fair_price: f64, overround: f64, bounds: &PriceBounds) -> f64 {
    let quotient = fair_price / overround;
    if quotient.is_finite() {
        f64::min(f64::max(*bounds.start(), quotient), *bounds.end())
    } else {
        *bounds.end()
    }
}

#[inline]
pub fn round(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
