use chrono::{DateTime, Utc};
use ordinalizer::Ordinal;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

use oddsmaker::probs::SliceExt;

pub type TeamId = String;

#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}
impl FormResult {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(FormResult::Win),
            'D' => Some(FormResult::Draw),
            'L' => Some(FormResult::Loss),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Draw => 'D',
            FormResult::Loss => 'L',
        }
    }
}

/// Results of a team at one venue (home or away).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
}
impl VenueRecord {
    pub fn avg_goals_scored(&self) -> Option<f64> {
        ratio(self.goals_scored, self.matches)
    }
}

/// Aggregate historical figures of a team. `wins + draws + losses == matches_played` is
/// assumed but not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_id: TeamId,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,

    /// Recent results, most recent first; e.g., `"WWDLW"`.
    #[serde(default)]
    pub form: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_record: Option<VenueRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_record: Option<VenueRecord>,
}
impl TeamStats {
    pub fn win_rate(&self) -> Option<f64> {
        ratio(self.wins, self.matches_played)
    }

    pub fn draw_rate(&self) -> Option<f64> {
        ratio(self.draws, self.matches_played)
    }

    pub fn avg_goals_scored(&self) -> Option<f64> {
        ratio(self.goals_scored, self.matches_played)
    }

    pub fn avg_goals_conceded(&self) -> Option<f64> {
        ratio(self.goals_conceded, self.matches_played)
    }

    pub fn goal_difference_per_match(&self) -> Option<f64> {
        if self.matches_played == 0 {
            None
        } else {
            Some((self.goals_scored as f64 - self.goals_conceded as f64) / self.matches_played as f64)
        }
    }

    /// Recognised entries of the form string, most recent first.
    pub fn form_results(&self) -> Vec<FormResult> {
        self.form.chars().filter_map(FormResult::from_char).collect()
    }

    pub fn record(&self, side: Side) -> Option<&VenueRecord> {
        match side {
            Side::Home => self.home_record.as_ref(),
            Side::Away => self.away_record.as_ref(),
        }
    }
}

fn ratio(numerator: u32, denominator: u32) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Ordinal,
    EnumCount,
    EnumIter,
    IntoStaticStr,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Home,
    Draw,
    Away,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Ordinal, EnumCount, EnumIter, IntoStaticStr)]
pub enum DoubleChanceOutcome {
    #[strum(serialize = "home or draw")]
    HomeOrDraw,
    #[strum(serialize = "draw or away")]
    DrawOrAway,
    #[strum(serialize = "home or away")]
    HomeOrAway,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Ordinal, EnumCount, EnumIter, IntoStaticStr)]
pub enum BothTeamsScoreOutcome {
    #[strum(serialize = "yes")]
    Yes,
    #[strum(serialize = "no")]
    No,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Ordinal, EnumCount, EnumIter, IntoStaticStr)]
pub enum TotalGoalsOutcome {
    #[strum(serialize = "over")]
    Over,
    #[strum(serialize = "under")]
    Under,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, EnumIter, strum_macros::Display)]
pub enum MarketKind {
    #[strum(serialize = "1X2")]
    MatchResult,
    #[strum(serialize = "Double chance")]
    DoubleChance,
    #[strum(serialize = "BTTS")]
    BothTeamsScore,
    #[strum(serialize = "Over/Under")]
    OverUnder,
}
impl MarketKind {
    /// The sum of the fair probabilities across the market's outcomes. Each outcome of the
    /// double chance market covers two of the three match outcomes, hence 2.
    pub fn fair_booksum(&self) -> f64 {
        match self {
            MarketKind::DoubleChance => 2.0,
            _ => 1.0,
        }
    }

    pub fn outcome_labels(&self) -> Vec<&'static str> {
        use strum::IntoEnumIterator;
        match self {
            MarketKind::MatchResult => MatchOutcome::iter().map(Into::into).collect(),
            MarketKind::DoubleChance => DoubleChanceOutcome::iter().map(Into::into).collect(),
            MarketKind::BothTeamsScore => BothTeamsScoreOutcome::iter().map(Into::into).collect(),
            MarketKind::OverUnder => TotalGoalsOutcome::iter().map(Into::into).collect(),
        }
    }
}

/// Outcome probabilities of a single match, derived once per generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    /// P(total goals > `goal_line`).
    pub over: f64,
    pub under: f64,
    pub goal_line: f64,
    pub both_teams_score: f64,
    pub home_expected_goals: f64,
    pub away_expected_goals: f64,
}
impl MatchProbabilities {
    /// Home, draw and away probabilities, normalised to sum to 1.
    pub fn match_result(&self) -> [f64; 3] {
        let mut probs = [self.home_win, self.draw, self.away_win];
        probs.normalise(1.0);
        probs
    }

    pub fn double_chance(&self) -> [f64; 3] {
        let [home, draw, away] = self.match_result();
        [home + draw, draw + away, home + away]
    }

    pub fn both_teams_score(&self) -> [f64; 2] {
        [self.both_teams_score, 1.0 - self.both_teams_score]
    }

    pub fn total_goals(&self) -> [f64; 2] {
        [self.over, self.under]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResultOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}
impl MatchResultOdds {
    pub fn prices(&self) -> [f64; 3] {
        [self.home, self.draw, self.away]
    }

    pub fn get(&self, outcome: MatchOutcome) -> f64 {
        self.prices()[outcome.ordinal()]
    }

    pub fn set(&mut self, outcome: MatchOutcome, price: f64) {
        match outcome {
            MatchOutcome::Home => self.home = price,
            MatchOutcome::Draw => self.draw = price,
            MatchOutcome::Away => self.away = price,
        }
    }
}

impl From<[f64; 3]> for MatchResultOdds {
    fn from([home, draw, away]: [f64; 3]) -> Self {
        Self { home, draw, away }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoubleChanceOdds {
    pub home_or_draw: f64,
    pub draw_or_away: f64,
    pub home_or_away: f64,
}
impl DoubleChanceOdds {
    pub fn prices(&self) -> [f64; 3] {
        [self.home_or_draw, self.draw_or_away, self.home_or_away]
    }
}

impl From<[f64; 3]> for DoubleChanceOdds {
    fn from([home_or_draw, draw_or_away, home_or_away]: [f64; 3]) -> Self {
        Self {
            home_or_draw,
            draw_or_away,
            home_or_away,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BothTeamsScoreOdds {
    pub yes: f64,
    pub no: f64,
}
impl BothTeamsScoreOdds {
    pub fn prices(&self) -> [f64; 2] {
        [self.yes, self.no]
    }
}

impl From<[f64; 2]> for BothTeamsScoreOdds {
    fn from([yes, no]: [f64; 2]) -> Self {
        Self { yes, no }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverUnderOdds {
    pub over: f64,
    pub under: f64,
    pub line: f64,
}
impl OverUnderOdds {
    pub fn prices(&self) -> [f64; 2] {
        [self.over, self.under]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOdds {
    pub match_result: MatchResultOdds,
    pub double_chance: DoubleChanceOdds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub both_teams_score: Option<BothTeamsScoreOdds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over_under: Option<OverUnderOdds>,
    pub generated_at: DateTime<Utc>,
}
impl MatchOdds {
    /// Prices of every generated market, in display order.
    pub fn markets(&self) -> Vec<(MarketKind, Vec<f64>)> {
        let mut markets = vec![
            (MarketKind::MatchResult, self.match_result.prices().to_vec()),
            (MarketKind::DoubleChance, self.double_chance.prices().to_vec()),
        ];
        if let Some(btts) = &self.both_teams_score {
            markets.push((MarketKind::BothTeamsScore, btts.prices().to_vec()));
        }
        if let Some(over_under) = &self.over_under {
            markets.push((MarketKind::OverUnder, over_under.prices().to_vec()));
        }
        markets
    }
}
