//! Inspection of generated odds. Each check is an assertion object returning a typed error; the
//! [`Validator`] runs them over every market and collects the outcome into an
//! [`OddsValidationResult`]. Nothing here mutates the odds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use oddsmaker::format;
use oddsmaker::market::{Market, PriceBounds};
use oddsmaker::probs::SliceExt;

use crate::config::GeneratorConfig;
use crate::domain::{MarketKind, MatchOdds};

#[derive(Debug, Error)]
pub enum InvalidPrice {
    #[error("{0}")]
    OutOfRange(#[from] PriceOutOfRange),

    #[error("{0}")]
    NonFinite(#[from] NonFinitePrice),
}

#[derive(Debug, Error)]
#[error("{market} '{outcome}' price {price} outside of {bounds:?}")]
pub struct PriceOutOfRange {
    pub market: MarketKind,
    pub outcome: &'static str,
    pub price: f64,
    pub bounds: PriceBounds,
}

#[derive(Debug, Error)]
#[error("{market} '{outcome}' price {price} is not a finite number")]
pub struct NonFinitePrice {
    pub market: MarketKind,
    pub outcome: &'static str,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct PriceRangeAssertion {
    pub bounds: PriceBounds,
}
impl PriceRangeAssertion {
    pub fn check(
        &self,
        market: MarketKind,
        outcome: &'static str,
        price: f64,
    ) -> Result<(), InvalidPrice> {
        if !price.is_finite() {
            Err(NonFinitePrice {
                market,
                outcome,
                price,
            }
            .into())
        } else if !self.bounds.contains(&price) {
            Err(PriceOutOfRange {
                market,
                outcome,
                price,
                bounds: self.bounds.clone(),
            }
            .into())
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Error)]
#[error("arbitrage in {market}: booksum {booksum:.4} does not exceed {fair_booksum}")]
pub struct Arbitrage {
    pub market: MarketKind,
    pub booksum: f64,
    pub fair_booksum: f64,
}

/// Requires the booksum of a market to strictly exceed its fair booksum.
pub struct ArbitrageAssertion;
impl ArbitrageAssertion {
    pub fn check(market: MarketKind, prices: &[f64]) -> Result<(), Arbitrage> {
        let booksum = prices.booksum();
        let fair_booksum = market.fair_booksum();
        if booksum <= fair_booksum {
            Err(Arbitrage {
                market,
                booksum,
                fair_booksum,
            })
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Error)]
#[error("negative {market} margin {margin:.2}%")]
pub struct NegativeMargin {
    pub market: MarketKind,
    pub margin: f64,
}

#[derive(Debug, Error)]
#[error("{market} margin {margin:.2}% exceeds {threshold:.2}%")]
pub struct HighMargin {
    pub market: MarketKind,
    pub margin: f64,
    pub threshold: f64,
}

/// Bounds the margin, in percent, of a market whose fair booksum is 1.
#[derive(Debug, Clone)]
pub struct MarginAssertion {
    pub high_margin_warning: f64,
}
impl MarginAssertion {
    pub fn margin(prices: &[f64]) -> f64 {
        format::margin(prices) * 100.0
    }

    /// A negative margin is an error; one above the warning threshold yields `Ok(Some(_))`.
    pub fn check(
        &self,
        market: MarketKind,
        prices: &[f64],
    ) -> Result<Option<HighMargin>, NegativeMargin> {
        let margin = Self::margin(prices);
        if margin < 0.0 {
            Err(NegativeMargin { market, margin })
        } else if margin > self.high_margin_warning {
            Ok(Some(HighMargin {
                market,
                margin,
                threshold: self.high_margin_warning,
            }))
        } else {
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Margin of the 1X2 market, in percent.
    pub margin: f64,
    /// Whether the 1X2 market admits an arbitrage.
    pub has_arbitrage: bool,
    /// Overround of every validated market, relative to its fair booksum.
    pub overrounds: Vec<(MarketKind, f64)>,
}

#[derive(Debug, Clone)]
pub struct Validator {
    pub range: PriceRangeAssertion,
    pub margin: MarginAssertion,
}
impl Default for Validator {
    fn default() -> Self {
        Self::from(&GeneratorConfig::default())
    }
}

impl From<&GeneratorConfig> for Validator {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            range: PriceRangeAssertion {
                bounds: config.price_bounds.clone(),
            },
            margin: MarginAssertion {
                high_margin_warning: config.high_margin_warning,
            },
        }
    }
}

impl Validator {
    pub fn validate(&self, odds: &MatchOdds) -> OddsValidationResult {
        let mut errors = vec![];
        let mut warnings = vec![];
        let mut overrounds = vec![];
        let mut has_arbitrage = false;

        for (market, prices) in odds.markets() {
            for (outcome, &price) in market.outcome_labels().into_iter().zip(&prices) {
                if let Err(err) = self.range.check(market, outcome, price) {
                    errors.push(err.to_string());
                }
            }
            if let Err(err) = ArbitrageAssertion::check(market, &prices) {
                if market == MarketKind::MatchResult {
                    has_arbitrage = true;
                }
                errors.push(err.to_string());
            }
            let fitted = Market::fit(prices, market.fair_booksum());
            overrounds.push((market, fitted.overround.value));
        }

        let match_result = odds.match_result.prices();
        match self.margin.check(MarketKind::MatchResult, &match_result) {
            Ok(None) => {}
            Ok(Some(high)) => warnings.push(high.to_string()),
            Err(negative) => errors.push(negative.to_string()),
        }

        OddsValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            margin: MarginAssertion::margin(&match_result),
            has_arbitrage,
            overrounds,
        }
    }
}
