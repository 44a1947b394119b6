//! End-to-end generation of a match's odds: fetches both teams' statistics, derives the
//! outcome probabilities, prices the markets and refuses to publish odds that fail validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use oddsmaker::timed::Timed;

use crate::config::{ConfigError, GeneratorConfig};
use crate::data::TeamStatsProvider;
use crate::domain::{MatchOdds, MatchProbabilities, Side, TeamId, TeamStats};
use crate::model::{calculate_probabilities, Ratings};
use crate::pricing::generate_market_odds;
use crate::validation::{OddsValidationResult, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub match_id: String,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    /// Defaults to [`GeneratorConfig::default_margin`].
    #[serde(default)]
    pub bookmaker_margin: Option<f64>,
    #[serde(default = "default_use_form")]
    pub use_form: bool,
    /// Overrides [`crate::config::StrengthWeights::form`].
    #[serde(default)]
    pub form_weight: Option<f64>,
}
impl GenerationRequest {
    pub fn new(match_id: impl Into<String>, home_team_id: impl Into<TeamId>, away_team_id: impl Into<TeamId>) -> Self {
        Self {
            match_id: match_id.into(),
            home_team_id: home_team_id.into(),
            away_team_id: away_team_id.into(),
            bookmaker_margin: None,
            use_form: default_use_form(),
            form_weight: None,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.bookmaker_margin = Some(margin);
        self
    }

    fn team_id(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team_id,
            Side::Away => &self.away_team_id,
        }
    }
}

fn default_use_form() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsGenerationResult {
    pub match_id: String,
    pub odds: MatchOdds,
    pub probabilities: MatchProbabilities,
    pub home_stats: TeamStats,
    pub away_stats: TeamStats,
    pub margin: f64,
    pub generated_at: DateTime<Utc>,
    pub validation: OddsValidationResult,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ConfigError),

    #[error("invalid request: team {0} cannot play itself")]
    SameTeam(TeamId),

    #[error("no statistics for {side} team {team_id}")]
    MissingStats { side: Side, team_id: TeamId },

    #[error("invalid odds: {}", .0.errors.join("; "))]
    InvalidOdds(OddsValidationResult),
}

pub fn generate_match_odds(
    request: &GenerationRequest,
    provider: &impl TeamStatsProvider,
    config: &GeneratorConfig,
) -> Result<OddsGenerationResult, GenerationError> {
    config.validate()?;
    let margin = config.check_margin(request.bookmaker_margin.unwrap_or(config.default_margin))?;
    if request.home_team_id == request.away_team_id {
        return Err(GenerationError::SameTeam(request.home_team_id.clone()));
    }
    let config = config.with_form(request.use_form, request.form_weight)?;

    let home_stats = fetch_stats(request, Side::Home, provider)?;
    let away_stats = fetch_stats(request, Side::Away, provider)?;

    let Timed {
        value: (probabilities, odds, validation),
        elapsed,
    } = Timed::of(|| {
        let probabilities = calculate_probabilities(&home_stats, &away_stats, &config);
        let odds = generate_market_odds(&probabilities, margin, &config);
        let validation = Validator::from(&config).validate(&odds);
        (probabilities, odds, validation)
    });
    debug!(
        "match {}: {:?}, {probabilities:?}, took {elapsed:?}",
        request.match_id,
        Ratings::evaluate(&home_stats, &away_stats, &config)
    );

    if !validation.is_valid {
        warn!(
            "match {}: withholding invalid odds: {:?}",
            request.match_id, validation.errors
        );
        return Err(GenerationError::InvalidOdds(validation));
    }
    for warning in &validation.warnings {
        warn!("match {}: {warning}", request.match_id);
    }

    Ok(OddsGenerationResult {
        match_id: request.match_id.clone(),
        generated_at: odds.generated_at,
        odds,
        probabilities,
        home_stats,
        away_stats,
        margin,
        validation,
    })
}

fn fetch_stats(
    request: &GenerationRequest,
    side: Side,
    provider: &impl TeamStatsProvider,
) -> Result<TeamStats, GenerationError> {
    let team_id = request.team_id(side);
    provider.team_stats(team_id).ok_or_else(|| {
        warn!("match {}: no statistics for {side} team {team_id}", request.match_id);
        GenerationError::MissingStats {
            side,
            team_id: team_id.into(),
        }
    })
}

/// Generates odds for each of the independent `requests`, in order.
pub fn generate_batch(
    requests: &[GenerationRequest],
    provider: &impl TeamStatsProvider,
    config: &GeneratorConfig,
) -> Vec<Result<OddsGenerationResult, GenerationError>> {
    requests
        .iter()
        .map(|request| generate_match_odds(request, provider, config))
        .collect()
}

#[cfg(test)]
mod tests;
