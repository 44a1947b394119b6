//! Conversions between decimal, fractional and American odds.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};
use thiserror::Error;

use crate::market::round;
use crate::probs::SliceExt;

/// Fractional prices are quoted to this many units of stake.
const FRACTIONAL_PRECISION: u64 = 100;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    Decimal,
    Fractional,
    American,
}
impl OddsFormat {
    pub fn render(&self, price: f64) -> String {
        match self {
            OddsFormat::Decimal => format!("{price:.2}"),
            OddsFormat::Fractional => Fraction::from_decimal(price).to_string(),
            OddsFormat::American => match American::from_decimal(price) {
                None => "-".into(),
                Some(american) => american.to_string(),
            },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseOddsError {
    #[error("malformed fraction '{0}'")]
    MalformedFraction(String),

    #[error("zero denominator in '{0}'")]
    ZeroDenominator(String),

    #[error("malformed American odds '{0}'")]
    MalformedAmerican(String),

    #[error("American odds must be at least 100 in magnitude, got {0}")]
    AmericanOutOfRange(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fraction {
    pub numerator: u64,
    pub denominator: u64,
}
impl Fraction {
    /// Expresses the profit portion of a decimal `price` as a reduced fraction. Prices at or
    /// below 1.0 carry no profit and map to `0/1`.
    pub fn from_decimal(price: f64) -> Self {
        if !(price > 1.0) || !price.is_finite() {
            return Self {
                numerator: 0,
                denominator: 1,
            };
        }
        let numerator = ((price - 1.0) * FRACTIONAL_PRECISION as f64).round() as u64;
        let divisor = gcd(numerator, FRACTIONAL_PRECISION);
        Self {
            numerator: numerator / divisor,
            denominator: FRACTIONAL_PRECISION / divisor,
        }
    }

    pub fn quotient(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn to_decimal(&self) -> f64 {
        round(self.quotient() + 1.0, 2)
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Fraction {
    type Err = ParseOddsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseOddsError::MalformedFraction(s.into());
        let (numerator, denominator) = s.trim().split_once('/').ok_or_else(malformed)?;
        let numerator = numerator.trim().parse().map_err(|_| malformed())?;
        let denominator = denominator.trim().parse().map_err(|_| malformed())?;
        if denominator == 0 {
            return Err(ParseOddsError::ZeroDenominator(s.into()));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }
}

/// American (moneyline) odds: `+150` is the profit on a 100 stake; `-200` is the stake
/// required to profit 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct American(i64);
impl American {
    pub fn new(value: i64) -> Result<Self, ParseOddsError> {
        if value.abs() < 100 {
            Err(ParseOddsError::AmericanOutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// `None` for prices that do not return a profit.
    pub fn from_decimal(price: f64) -> Option<Self> {
        if !(price > 1.0) || !price.is_finite() {
            None
        } else if price >= 2.0 {
            Some(Self(((price - 1.0) * 100.0).round() as i64))
        } else {
            let value = (-100.0 / (price - 1.0)).round() as i64;
            Some(Self(i64::min(value, -100)))
        }
    }

    pub fn to_decimal(&self) -> f64 {
        let decimal = if self.0 > 0 {
            self.0 as f64 / 100.0 + 1.0
        } else {
            100.0 / self.0.abs() as f64 + 1.0
        };
        round(decimal, 2)
    }
}

impl Display for American {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for American {
    type Err = ParseOddsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let value = unsigned
            .parse()
            .map_err(|_| ParseOddsError::MalformedAmerican(s.into()))?;
        Self::new(value)
    }
}

/// The probability implied by a decimal `price`, or zero for a non-positive price.
pub fn implied_probability(price: f64) -> f64 {
    if price > 0.0 {
        1.0 / price
    } else {
        0.0
    }
}

/// The bookmaker margin of a complete market whose fair booksum is 1, as a fraction of the
/// stake; e.g., 0.05 for a booksum of 1.05.
pub fn margin(prices: &[f64]) -> f64 {
    prices.booksum() - 1.0
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
