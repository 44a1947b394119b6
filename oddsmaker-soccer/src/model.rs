//! Outcome probabilities of a match. Win/draw/loss follow a logistic transform of the strength
//! differential together with a dynamic draw estimate; goal markets follow a pair of
//! independent Poisson goal processes.

use tracing::trace;

use oddsmaker::factorial::{self, LOOKUP};
use oddsmaker::poisson;
use oddsmaker::probs::{clamp, SliceExt};

use crate::config::{DrawConfig, GeneratorConfig, GoalsConfig};
use crate::domain::{MatchProbabilities, Side, TeamStats};
use crate::strength::{expected_goals, strength};

#[derive(Debug, Clone, PartialEq)]
pub struct Ratings {
    pub home_strength: f64,
    pub away_strength: f64,
    /// Home strength, plus the home advantage, less the away strength.
    pub differential: f64,
}
impl Ratings {
    pub fn evaluate(home: &TeamStats, away: &TeamStats, config: &GeneratorConfig) -> Self {
        let home_strength = strength(home, &config.strength);
        let away_strength = strength(away, &config.strength);
        Self {
            home_strength,
            away_strength,
            differential: home_strength + config.home_advantage - away_strength,
        }
    }
}

/// Raw (unnormalised) home and away win probabilities. They always sum to 1, before the draw
/// is accounted for.
pub fn win_probabilities(differential: f64, sensitivity: f64) -> (f64, f64) {
    let home = 1.0 / (1.0 + f64::exp(-sensitivity * differential));
    let away = 1.0 / (1.0 + f64::exp(sensitivity * differential));
    (home, away)
}

/// Estimates the draw probability as a weighted blend of three draw-rate estimates:
///
/// * the base rate scaled by the evenness of the match, which decays exponentially with the
///   absolute strength differential;
/// * the mean historical draw rate of the two teams;
/// * the base rate scaled by the inverse of the mean goals conceded per match, so that tighter
///   defences draw more often.
///
/// The blend is clamped to `config.bounds`.
pub fn draw_probability(
    home: &TeamStats,
    away: &TeamStats,
    differential: f64,
    config: &DrawConfig,
) -> f64 {
    let evenness = {
        let decay = f64::exp(-differential.abs() / config.strength_decay);
        let (low, high) = (*config.strength_scale.start(), *config.strength_scale.end());
        config.base_rate * (low + (high - low) * decay)
    };

    let history = {
        let home_rate = home.draw_rate().unwrap_or(config.base_rate);
        let away_rate = away.draw_rate().unwrap_or(config.base_rate);
        (home_rate + away_rate) / 2.0
    };

    let defence = {
        let home_conceded = home.avg_goals_conceded().unwrap_or(config.defence_reference);
        let away_conceded = away.avg_goals_conceded().unwrap_or(config.defence_reference);
        let conceded = (home_conceded + away_conceded) / 2.0;
        let (low, high) = (*config.defence_scale.start(), *config.defence_scale.end());
        let scale = if conceded > 0.0 {
            clamp(config.defence_reference / conceded, low, high)
        } else {
            high
        };
        config.base_rate * scale
    };

    let weights = &config.weights;
    let blended =
        weights.strength * evenness + weights.history * history + weights.defence * defence;
    trace!("draw factors: evenness={evenness:.4}, history={history:.4}, defence={defence:.4}, blended={blended:.4}");
    clamp(blended, *config.bounds.start(), *config.bounds.end())
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProbabilities {
    pub over: f64,
    pub under: f64,
    pub both_teams_score: f64,
}

/// Over/under and both-teams-to-score probabilities, assuming independent Poisson goal counts.
/// Each team's goals are enumerated over `0..=config.max_goals`, capped at
/// [`factorial::MAX_N`] where the factorial lookup ends; `under` is the exact complement of
/// `over`.
pub fn goal_probabilities(
    home_expected_goals: f64,
    away_expected_goals: f64,
    config: &GoalsConfig,
) -> GoalProbabilities {
    let over = poisson::total_over(
        home_expected_goals,
        away_expected_goals,
        config.goal_line,
        u8::min(config.max_goals, factorial::MAX_N),
        &LOOKUP,
    );
    let home_scores = 1.0 - poisson::univariate(0, home_expected_goals, &LOOKUP);
    let away_scores = 1.0 - poisson::univariate(0, away_expected_goals, &LOOKUP);
    GoalProbabilities {
        over,
        under: 1.0 - over,
        both_teams_score: home_scores * away_scores,
    }
}

/// Combines two teams' statistics into the full set of match probabilities. Both teams'
/// statistics must be present; missing data is dealt with by the caller.
pub fn calculate_probabilities(
    home: &TeamStats,
    away: &TeamStats,
    config: &GeneratorConfig,
) -> MatchProbabilities {
    let ratings = Ratings::evaluate(home, away, config);
    let (home_win, away_win) = win_probabilities(ratings.differential, config.sensitivity);
    let draw = draw_probability(home, away, ratings.differential, &config.draw);

    let mut outcomes = [home_win, draw, away_win];
    outcomes.normalise(1.0);
    let [home_win, draw, away_win] = outcomes;

    let home_expected_goals = expected_goals(home, Side::Home, &config.goals);
    let away_expected_goals = expected_goals(away, Side::Away, &config.goals);
    let goals = goal_probabilities(home_expected_goals, away_expected_goals, &config.goals);
    trace!("ratings: {ratings:?}, goals: {goals:?}");

    MatchProbabilities {
        home_win,
        draw,
        away_win,
        over: goals.over,
        under: goals.under,
        goal_line: config.goals.goal_line,
        both_teams_score: goals.both_teams_score,
        home_expected_goals,
        away_expected_goals,
    }
}
