//! Prices every market of a match from its outcome probabilities, applying a uniform overround
//! within each market.

use chrono::Utc;
use rustc_hash::FxHashMap;
use strum::IntoEnumIterator;
use tracing::trace;

use oddsmaker::market::{round, Market, Overround, PriceBounds};

use crate::config::{self, ConfigError, GeneratorConfig};
use crate::domain::{
    BothTeamsScoreOdds, DoubleChanceOdds, MatchOdds, MatchOutcome, MatchProbabilities,
    MatchResultOdds, OverUnderOdds,
};

/// Published prices are rounded to this many decimal places.
pub const PRICE_DECIMALS: u8 = 2;

/// Manual adjustments, in percent, are confined to this range.
pub const ADJUSTMENT_BOUNDS: config::Bounds = -50.0..=50.0;

/// Frames the prices of every selected market. Each price is the fair price `1 / p` divided
/// by `1 + margin`, capped to `config.price_bounds` and finally rounded to [`PRICE_DECIMALS`].
/// The margin is assumed to have been checked by the caller.
pub fn generate_market_odds(
    probs: &MatchProbabilities,
    margin: f64,
    config: &GeneratorConfig,
) -> MatchOdds {
    let overround = Overround::from_margin(margin);
    let bounds = &config.price_bounds;

    let match_result = frame(&overround, probs.match_result().to_vec(), bounds);
    let double_chance = frame(&overround, probs.double_chance().to_vec(), bounds);
    let both_teams_score = config.markets.both_teams_score.then(|| {
        let [yes, no] = frame(&overround, probs.both_teams_score().to_vec(), bounds);
        BothTeamsScoreOdds { yes, no }
    });
    let over_under = config.markets.over_under.then(|| {
        let [over, under] = frame(&overround, probs.total_goals().to_vec(), bounds);
        OverUnderOdds {
            over,
            under,
            line: probs.goal_line,
        }
    });

    MatchOdds {
        match_result: MatchResultOdds::from(match_result),
        double_chance: DoubleChanceOdds::from(double_chance),
        both_teams_score,
        over_under,
        generated_at: Utc::now(),
    }
}

fn frame<const N: usize>(overround: &Overround, probs: Vec<f64>, bounds: &PriceBounds) -> [f64; N] {
    let mut market = Market::frame(overround, probs, bounds);
    market.round_prices(PRICE_DECIMALS);
    trace!("framed {:?} with booksum {:.4}", market.prices, market.booksum());
    let mut prices = [0.0; N];
    for (price, framed) in prices.iter_mut().zip(market.prices) {
        *price = framed;
    }
    prices
}

/// Scales the 1X2 prices by `1 + adjustment / 100` for each outcome present in `adjustments`,
/// leaving every other price untouched. The result is not validated.
pub fn apply_manual_adjustments(
    odds: &MatchOdds,
    adjustments: &FxHashMap<MatchOutcome, f64>,
) -> Result<MatchOdds, ConfigError> {
    let mut adjusted = odds.clone();
    for outcome in MatchOutcome::iter() {
        let Some(&adjustment) = adjustments.get(&outcome) else {
            continue;
        };
        config::finite("adjustment", adjustment)?;
        config::within("adjustment", adjustment, &ADJUSTMENT_BOUNDS)?;
        if adjustment == 0.0 {
            continue;
        }
        let price = odds.match_result.get(outcome) * (1.0 + adjustment / 100.0);
        adjusted
            .match_result
            .set(outcome, round(price, PRICE_DECIMALS));
    }
    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use tinyrand::Wyrand;

    use oddsmaker::probs::SliceExt;
    use oddsmaker_testing::assert_slice_f64_absolute;

    use crate::model::calculate_probabilities;
    use crate::testing::random_team;

    use super::*;

    fn probs() -> MatchProbabilities {
        MatchProbabilities {
            home_win: 0.5,
            draw: 0.25,
            away_win: 0.25,
            over: 0.48,
            under: 0.52,
            goal_line: 2.5,
            both_teams_score: 0.55,
            home_expected_goals: 1.6,
            away_expected_goals: 1.1,
        }
    }

    #[test]
    fn fair_prices_without_margin() {
        let odds = generate_market_odds(&probs(), 0.0, &GeneratorConfig::default());
        assert_eq!([2.0, 4.0, 4.0], odds.match_result.prices());
        assert_eq!([1.33, 2.0, 1.33], odds.double_chance.prices());
        assert_float_absolute_eq!(1.0, odds.match_result.prices().booksum(), 1e-4);
        let over_under = odds.over_under.unwrap();
        assert_eq!([2.08, 1.92], over_under.prices());
        assert_eq!(2.5, over_under.line);
        assert_eq!([1.82, 2.22], odds.both_teams_score.unwrap().prices());
    }

    #[test]
    fn margin_applied_uniformly() {
        let odds = generate_market_odds(&probs(), 0.05, &GeneratorConfig::default());
        // 2/1.05, 4/1.05
        assert_eq!([1.9, 3.81, 3.81], odds.match_result.prices());
        assert_float_absolute_eq!(1.05, odds.match_result.prices().booksum(), 1e-2);
    }

    #[test]
    fn higher_margin_lowers_every_price() {
        let config = GeneratorConfig::default();
        let mut previous = generate_market_odds(&probs(), 0.0, &config);
        for margin in [0.05, 0.1, 0.2] {
            let odds = generate_market_odds(&probs(), margin, &config);
            for ((_, prices), (_, previous_prices)) in odds.markets().iter().zip(previous.markets().iter()) {
                for (price, previous_price) in prices.iter().zip(previous_prices) {
                    assert!(price < previous_price, "{price} ≥ {previous_price} at margin {margin}");
                }
            }
            previous = odds;
        }
    }

    #[test]
    fn zero_probability_capped() {
        let mut probs = probs();
        probs.both_teams_score = 0.0;
        let odds = generate_market_odds(&probs, 0.05, &GeneratorConfig::default());
        let btts = odds.both_teams_score.unwrap();
        assert_eq!(100.0, btts.yes);
        assert_eq!(1.01, btts.no);
    }

    #[test]
    fn optional_markets_deselected() {
        let mut config = GeneratorConfig::default();
        config.markets.both_teams_score = false;
        config.markets.over_under = false;
        let odds = generate_market_odds(&probs(), 0.05, &config);
        assert_eq!(None, odds.both_teams_score);
        assert_eq!(None, odds.over_under);
        assert_eq!(2, odds.markets().len());
    }

    #[test]
    fn random_prices_within_bounds() {
        let mut rand = Wyrand::default();
        let config = GeneratorConfig::default();
        for _ in 0..200 {
            let home = random_team("home", &mut rand);
            let away = random_team("away", &mut rand);
            let probs = calculate_probabilities(&home, &away, &config);
            let odds = generate_market_odds(&probs, 0.05, &config);
            for (market, prices) in odds.markets() {
                for price in prices {
                    assert!(config.price_bounds.contains(&price), "{market}: {price}");
                }
            }
            assert!(odds.match_result.prices().booksum() > 1.0);
        }
    }

    #[test]
    fn manual_adjustments() {
        let odds = generate_market_odds(&probs(), 0.05, &GeneratorConfig::default());
        let adjustments = FxHashMap::from_iter([(MatchOutcome::Home, 10.0), (MatchOutcome::Draw, 0.0)]);
        let adjusted = apply_manual_adjustments(&odds, &adjustments).unwrap();
        // 1.9 · 1.1
        assert_slice_f64_absolute(&[2.09, 3.81, 3.81], &adjusted.match_result.prices(), 1e-9);
        assert_eq!(odds.double_chance, adjusted.double_chance);
        assert_eq!(odds.generated_at, adjusted.generated_at);

        let adjustments = FxHashMap::from_iter([(MatchOutcome::Away, -20.0)]);
        let adjusted = apply_manual_adjustments(&odds, &adjustments).unwrap();
        // 3.81 · 0.8
        assert_float_absolute_eq!(3.05, adjusted.match_result.away, 1e-9);
    }

    #[test]
    fn excessive_adjustment_rejected() {
        let odds = generate_market_odds(&probs(), 0.05, &GeneratorConfig::default());
        let adjustments = FxHashMap::from_iter([(MatchOutcome::Draw, 75.0)]);
        assert_eq!(
            ConfigError::OutOfBounds {
                name: "adjustment",
                value: 75.0,
                bounds: ADJUSTMENT_BOUNDS
            },
            apply_manual_adjustments(&odds, &adjustments).unwrap_err()
        );
    }
}
