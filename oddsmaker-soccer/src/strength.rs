//! Reduction of a team's raw statistics into a scalar strength score and an expected goals
//! figure.

use oddsmaker::probs::clamp;

use crate::config::{FormPoints, GoalsConfig, StrengthWeights};
use crate::domain::{FormResult, Side, TeamStats};

/// A weighted combination of win rate, goal difference per match and recent form, clamped to
/// `weights.bounds`. A team without any matches rates as `weights.neutral`.
pub fn strength(stats: &TeamStats, weights: &StrengthWeights) -> f64 {
    let (Some(win_rate), Some(goal_difference)) =
        (stats.win_rate(), stats.goal_difference_per_match())
    else {
        return weights.neutral;
    };
    let form = form_score(&stats.form_results(), &weights.form_points);
    let score = weights.baseline
        + weights.win_rate * win_rate
        + weights.goal_difference * goal_difference
        + weights.form * form;
    clamp(score, *weights.bounds.start(), *weights.bounds.end())
}

/// Sums the points of each result, weighting the i-th most recent of `n` results by `n - i`.
pub fn form_score(results: &[FormResult], points: &FormPoints) -> f64 {
    let len = results.len();
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let weight = (len - index) as f64;
            let points = match result {
                FormResult::Win => points.win,
                FormResult::Draw => points.draw,
                FormResult::Loss => points.loss,
            };
            points * weight
        })
        .sum()
}

/// The Poisson rate of goals scored by a team playing on `side`. Prefers the team's record at
/// that venue; falls back to its overall average (plus the home bonus when at home), and
/// finally to the league default.
pub fn expected_goals(stats: &TeamStats, side: Side, config: &GoalsConfig) -> f64 {
    let venue_average = stats
        .record(side)
        .and_then(|record| record.avg_goals_scored());
    let goals = match venue_average {
        Some(average) => average,
        None => {
            let bonus = match side {
                Side::Home => config.home_goals_bonus,
                Side::Away => 0.0,
            };
            let average = match stats.avg_goals_scored() {
                Some(average) if average > 0.0 => average,
                _ => config.default_expected_goals,
            };
            average + bonus
        }
    };
    clamp(goals, *config.bounds.start(), *config.bounds.end())
}
