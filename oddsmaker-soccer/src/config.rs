//! Tunable parameters of the odds generator. Every coefficient of the strength, draw and goal
//! models lives here, so that generation is a pure function of the team statistics and a
//! [`GeneratorConfig`].

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use oddsmaker::factorial;
use oddsmaker::market::PriceBounds;

pub type Bounds = RangeInclusive<f64>;

const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be a finite number, got {1}")]
    NonFinite(&'static str, f64),

    #[error("{0} must not be negative, got {1}")]
    Negative(&'static str, f64),

    #[error("{name} must lie in {bounds:?}, got {value}")]
    OutOfBounds {
        name: &'static str,
        value: f64,
        bounds: Bounds,
    },

    #[error("{0} must be a non-empty range of finite numbers, got {1:?}")]
    MalformedBounds(&'static str, Bounds),

    #[error("goal line must be a half-goal line between 0 and {max_goals}, got {line}")]
    GoalLine { line: f64, max_goals: u8 },

    #[error("max goals {0} outside of 1..={max}", max = factorial::MAX_N)]
    MaxGoals(u8),

    #[error("draw factor weights must sum to 1, got {0}")]
    DrawWeights(f64),
}

/// Points awarded per form result, before weighting by recency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormPoints {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}
impl Default for FormPoints {
    fn default() -> Self {
        Self {
            win: 1.0,
            draw: 0.3,
            loss: -0.5,
        }
    }
}

/// Coefficients of the linear strength score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthWeights {
    /// Score of a team with an even record.
    pub baseline: f64,
    /// Score assigned to a team without any history.
    pub neutral: f64,
    /// Points per unit of win rate (1.0 = every match won).
    pub win_rate: f64,
    /// Points per goal of goal difference per match.
    pub goal_difference: f64,
    /// Multiplier of the recency-weighted form score.
    pub form: f64,
    pub form_points: FormPoints,
    pub bounds: Bounds,
}
impl Default for StrengthWeights {
    fn default() -> Self {
        Self {
            baseline: 50.0,
            neutral: 50.0,
            win_rate: 20.0,
            goal_difference: 10.0,
            form: 0.3,
            form_points: FormPoints::default(),
            bounds: 0.0..=100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalsConfig {
    /// Expected goals of a team without any scoring history.
    pub default_expected_goals: f64,
    pub bounds: Bounds,
    /// Added to the home side's expected goals when no home-venue record is available.
    pub home_goals_bonus: f64,
    /// Goals per team enumerated by the Poisson model.
    pub max_goals: u8,
    pub goal_line: f64,
}
impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            default_expected_goals: 1.3,
            bounds: 0.8..=4.0,
            home_goals_bonus: 0.1,
            max_goals: 10,
            goal_line: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawWeights {
    pub strength: f64,
    pub history: f64,
    pub defence: f64,
}
impl DrawWeights {
    pub fn sum(&self) -> f64 {
        self.strength + self.history + self.defence
    }
}

impl Default for DrawWeights {
    fn default() -> Self {
        Self {
            strength: 0.6,
            history: 0.25,
            defence: 0.15,
        }
    }
}

/// Parameters of the dynamic draw probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// League-average draw rate.
    pub base_rate: f64,
    /// Strength differential over which the evenness factor decays by a factor of e.
    pub strength_decay: f64,
    /// Multiples of the base rate spanned by the evenness factor, from one-sided to even.
    pub strength_scale: Bounds,
    /// League-average goals conceded per match.
    pub defence_reference: f64,
    pub defence_scale: Bounds,
    pub weights: DrawWeights,
    pub bounds: Bounds,
}
impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.27,
            strength_decay: 20.0,
            strength_scale: 0.7..=1.3,
            defence_reference: 1.3,
            defence_scale: 0.9..=1.1,
            weights: DrawWeights::default(),
            bounds: 0.15..=0.40,
        }
    }
}

/// Which of the optional markets are generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSelection {
    pub both_teams_score: bool,
    pub over_under: bool,
}
impl Default for MarketSelection {
    fn default() -> Self {
        Self {
            both_teams_score: true,
            over_under: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub strength: StrengthWeights,
    pub goals: GoalsConfig,
    pub draw: DrawConfig,
    /// Strength points added to the home side.
    pub home_advantage: f64,
    /// Slope `k` of the logistic transform of the strength differential.
    pub sensitivity: f64,
    pub default_margin: f64,
    pub margin_bounds: Bounds,
    pub price_bounds: PriceBounds,
    /// 1X2 margin, in percent, above which the odds are flagged as uncompetitive.
    pub high_margin_warning: f64,
    pub markets: MarketSelection,
}
impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strength: StrengthWeights::default(),
            goals: GoalsConfig::default(),
            draw: DrawConfig::default(),
            home_advantage: 4.0,
            sensitivity: 0.03,
            default_margin: 0.05,
            margin_bounds: 0.0..=0.5,
            price_bounds: 1.01..=100.0,
            high_margin_warning: 15.0,
            markets: MarketSelection::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let strength = &self.strength;
        finite("strength.baseline", strength.baseline)?;
        finite("strength.neutral", strength.neutral)?;
        finite("strength.win_rate", strength.win_rate)?;
        finite("strength.goal_difference", strength.goal_difference)?;
        non_negative("strength.form", strength.form)?;
        finite("strength.form_points.win", strength.form_points.win)?;
        finite("strength.form_points.draw", strength.form_points.draw)?;
        finite("strength.form_points.loss", strength.form_points.loss)?;
        well_formed("strength.bounds", &strength.bounds)?;

        let goals = &self.goals;
        well_formed("goals.bounds", &goals.bounds)?;
        within("goals.default_expected_goals", goals.default_expected_goals, &goals.bounds)?;
        non_negative("goals.home_goals_bonus", goals.home_goals_bonus)?;
        if goals.max_goals == 0 || goals.max_goals > factorial::MAX_N {
            return Err(ConfigError::MaxGoals(goals.max_goals));
        }
        check_goal_line(goals.goal_line, goals.max_goals)?;

        let draw = &self.draw;
        well_formed("draw.bounds", &draw.bounds)?;
        within("draw.base_rate", draw.base_rate, &(0.0..=1.0))?;
        positive("draw.strength_decay", draw.strength_decay)?;
        well_formed("draw.strength_scale", &draw.strength_scale)?;
        positive("draw.defence_reference", draw.defence_reference)?;
        well_formed("draw.defence_scale", &draw.defence_scale)?;
        non_negative("draw.weights.strength", draw.weights.strength)?;
        non_negative("draw.weights.history", draw.weights.history)?;
        non_negative("draw.weights.defence", draw.weights.defence)?;
        let weight_sum = draw.weights.sum();
        if (weight_sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::DrawWeights(weight_sum));
        }

        non_negative("home_advantage", self.home_advantage)?;
        positive("sensitivity", self.sensitivity)?;
        well_formed("margin_bounds", &self.margin_bounds)?;
        non_negative("margin_bounds.start", *self.margin_bounds.start())?;
        self.check_margin(self.default_margin)?;
        well_formed("price_bounds", &self.price_bounds)?;
        if *self.price_bounds.start() <= 1.0 {
            return Err(ConfigError::OutOfBounds {
                name: "price_bounds.start",
                value: *self.price_bounds.start(),
                bounds: 1.0..=f64::MAX,
            });
        }
        non_negative("high_margin_warning", self.high_margin_warning)?;
        Ok(())
    }

    /// Checks a caller-supplied bookmaker margin against `margin_bounds`.
    pub fn check_margin(&self, margin: f64) -> Result<f64, ConfigError> {
        finite("bookmaker_margin", margin)?;
        within("bookmaker_margin", margin, &self.margin_bounds)?;
        Ok(margin)
    }

    /// A copy of this config with the form term of the strength score switched off, or with
    /// its coefficient replaced by `form_weight`.
    pub fn with_form(&self, use_form: bool, form_weight: Option<f64>) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        if !use_form {
            config.strength.form = 0.0;
        } else if let Some(form_weight) = form_weight {
            config.strength.form = non_negative("form_weight", form_weight)?;
        }
        Ok(config)
    }
}

pub fn check_goal_line(line: f64, max_goals: u8) -> Result<f64, ConfigError> {
    let valid = line.is_finite() && line > 0.0 && line < max_goals as f64 && line.fract() == 0.5;
    if valid {
        Ok(line)
    } else {
        Err(ConfigError::GoalLine { line, max_goals })
    }
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite(name, value))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    finite(name, value)?;
    if value < 0.0 {
        Err(ConfigError::Negative(name, value))
    } else {
        Ok(value)
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    non_negative(name, value)?;
    within(name, value, &(f64::MIN_POSITIVE..=f64::MAX))
}

pub(crate) fn within(name: &'static str, value: f64, bounds: &Bounds) -> Result<f64, ConfigError> {
    if bounds.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfBounds {
            name,
            value,
            bounds: bounds.clone(),
        })
    }
}

fn well_formed(name: &'static str, bounds: &Bounds) -> Result<(), ConfigError> {
    if bounds.start().is_finite() && bounds.end().is_finite() && !bounds.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MalformedBounds(name, bounds.clone()))
    }
}
