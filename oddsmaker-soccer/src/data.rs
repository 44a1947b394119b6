//! Sources of team statistics: aggregation of completed match results, and the provider
//! abstraction the generator draws statistics from.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{FormResult, Side, TeamId, TeamStats, VenueRecord};

/// Number of recent matches aggregated into a team's statistics.
pub const DEFAULT_STATS_LIMIT: usize = 15;

/// Number of recent meetings summarised in a head-to-head record.
pub const DEFAULT_HEAD_TO_HEAD_LIMIT: usize = 5;

/// Length of the form string.
const FORM_LENGTH: usize = 5;

/// A completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub played_on: NaiveDate,
}
impl MatchResult {
    /// The side `team_id` played on, if it took part.
    pub fn side_of(&self, team_id: &str) -> Option<Side> {
        if self.home_team_id == team_id {
            Some(Side::Home)
        } else if self.away_team_id == team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Goals scored and conceded by the team on `side`.
    pub fn score(&self, side: Side) -> (u32, u32) {
        match side {
            Side::Home => (self.home_score, self.away_score),
            Side::Away => (self.away_score, self.home_score),
        }
    }

    pub fn total_goals(&self) -> u32 {
        self.home_score + self.away_score
    }
}

fn outcome(scored: u32, conceded: u32) -> FormResult {
    if scored > conceded {
        FormResult::Win
    } else if scored == conceded {
        FormResult::Draw
    } else {
        FormResult::Loss
    }
}

/// Up to `limit` results passing `filter`, most recent first. Results played on the same day
/// keep their relative order.
fn most_recent<'a>(
    results: &'a [MatchResult],
    limit: usize,
    filter: impl Fn(&MatchResult) -> bool,
) -> Vec<&'a MatchResult> {
    let mut selected: Vec<_> = results.iter().filter(|result| filter(result)).collect();
    selected.sort_by(|a, b| b.played_on.cmp(&a.played_on));
    selected.truncate(limit);
    selected
}

impl VenueRecord {
    fn add(&mut self, scored: u32, conceded: u32) {
        self.matches += 1;
        self.goals_scored += scored;
        self.goals_conceded += conceded;
        match outcome(scored, conceded) {
            FormResult::Win => self.wins += 1,
            FormResult::Draw => self.draws += 1,
            FormResult::Loss => self.losses += 1,
        }
    }
}

impl TeamStats {
    /// Aggregates the `limit` most recent of the team's `results`. `None` if the team has not
    /// played.
    pub fn from_results(team_id: &str, results: &[MatchResult], limit: usize) -> Option<Self> {
        let recent = most_recent(results, limit, |result| result.side_of(team_id).is_some());
        if recent.is_empty() {
            return None;
        }

        let mut home_record = VenueRecord::default();
        let mut away_record = VenueRecord::default();
        let mut form = String::with_capacity(FORM_LENGTH);
        for result in recent {
            let Some(side) = result.side_of(team_id) else {
                continue;
            };
            let (scored, conceded) = result.score(side);
            match side {
                Side::Home => home_record.add(scored, conceded),
                Side::Away => away_record.add(scored, conceded),
            }
            if form.len() < FORM_LENGTH {
                form.push(outcome(scored, conceded).to_char());
            }
        }

        Some(Self {
            team_id: team_id.into(),
            matches_played: home_record.matches + away_record.matches,
            wins: home_record.wins + away_record.wins,
            draws: home_record.draws + away_record.draws,
            losses: home_record.losses + away_record.losses,
            goals_scored: home_record.goals_scored + away_record.goals_scored,
            goals_conceded: home_record.goals_conceded + away_record.goals_conceded,
            form,
            home_record: Some(home_record),
            away_record: Some(away_record),
        })
    }
}

/// Summary of the recent meetings between two teams, irrespective of venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub team_a_wins: u32,
    pub team_b_wins: u32,
    pub draws: u32,
    /// Mean total goals per meeting.
    pub avg_goals: f64,
}
impl HeadToHead {
    pub fn from_results(
        team_a: &str,
        team_b: &str,
        results: &[MatchResult],
        limit: usize,
    ) -> Option<Self> {
        let meetings = most_recent(results, limit, |result| {
            result.side_of(team_a).is_some() && result.side_of(team_b).is_some()
        });
        if meetings.is_empty() {
            return None;
        }

        let mut head_to_head = Self {
            team_a: team_a.into(),
            team_b: team_b.into(),
            team_a_wins: 0,
            team_b_wins: 0,
            draws: 0,
            avg_goals: 0.0,
        };
        let mut total_goals = 0;
        for meeting in &meetings {
            total_goals += meeting.total_goals();
            let Some(side) = meeting.side_of(team_a) else {
                continue;
            };
            let (scored, conceded) = meeting.score(side);
            match outcome(scored, conceded) {
                FormResult::Win => head_to_head.team_a_wins += 1,
                FormResult::Draw => head_to_head.draws += 1,
                FormResult::Loss => head_to_head.team_b_wins += 1,
            }
        }
        head_to_head.avg_goals = total_goals as f64 / meetings.len() as f64;
        Some(head_to_head)
    }
}

/// Supplies the statistics of a team, or `None` if none are available. Implementations that
/// fetch remotely resolve the data before the generator is invoked.
pub trait TeamStatsProvider {
    fn team_stats(&self, team_id: &str) -> Option<TeamStats>;
}

impl<S: BuildHasher> TeamStatsProvider for HashMap<TeamId, TeamStats, S> {
    fn team_stats(&self, team_id: &str) -> Option<TeamStats> {
        self.get(team_id).cloned()
    }
}

impl<P: TeamStatsProvider + ?Sized> TeamStatsProvider for &P {
    fn team_stats(&self, team_id: &str) -> Option<TeamStats> {
        (**self).team_stats(team_id)
    }
}

impl<P: TeamStatsProvider + ?Sized> TeamStatsProvider for Arc<P> {
    fn team_stats(&self, team_id: &str) -> Option<TeamStats> {
        (**self).team_stats(team_id)
    }
}

/// Derives statistics on demand from a history of completed matches.
#[derive(Debug, Clone)]
pub struct ResultsProvider {
    results: Vec<MatchResult>,
    limit: usize,
}
impl ResultsProvider {
    pub fn new(results: Vec<MatchResult>) -> Self {
        Self::with_limit(results, DEFAULT_STATS_LIMIT)
    }

    pub fn with_limit(results: Vec<MatchResult>, limit: usize) -> Self {
        Self { results, limit }
    }

    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    pub fn head_to_head(&self, team_a: &str, team_b: &str) -> Option<HeadToHead> {
        HeadToHead::from_results(team_a, team_b, &self.results, DEFAULT_HEAD_TO_HEAD_LIMIT)
    }
}

impl TeamStatsProvider for ResultsProvider {
    fn team_stats(&self, team_id: &str) -> Option<TeamStats> {
        TeamStats::from_results(team_id, &self.results, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use rustc_hash::FxHashMap;

    use crate::testing::team;

    use super::*;

    fn result(home: &str, away: &str, home_score: u32, away_score: u32, day: u32) -> MatchResult {
        MatchResult {
            home_team_id: home.into(),
            away_team_id: away.into(),
            home_score,
            away_score,
            played_on: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        }
    }

    fn season() -> Vec<MatchResult> {
        vec![
            result("lions", "tigers", 2, 1, 1),
            result("bears", "lions", 0, 0, 8),
            result("tigers", "bears", 3, 3, 15),
            result("lions", "bears", 1, 3, 22),
            result("tigers", "lions", 0, 4, 29),
        ]
    }

    #[test]
    fn aggregate_team_results() {
        let stats = TeamStats::from_results("lions", &season(), DEFAULT_STATS_LIMIT).unwrap();
        assert_eq!(4, stats.matches_played);
        assert_eq!((2, 1, 1), (stats.wins, stats.draws, stats.losses));
        assert_eq!(7, stats.goals_scored);
        assert_eq!(4, stats.goals_conceded);
        assert_eq!("WLDW", stats.form);
        assert_eq!(
            Some(VenueRecord {
                matches: 2,
                wins: 1,
                draws: 0,
                losses: 1,
                goals_scored: 3,
                goals_conceded: 4,
            }),
            stats.home_record
        );
        assert_eq!(
            Some(VenueRecord {
                matches: 2,
                wins: 1,
                draws: 1,
                losses: 0,
                goals_scored: 4,
                goals_conceded: 0,
            }),
            stats.away_record
        );
    }

    #[test]
    fn aggregate_most_recent_only() {
        let stats = TeamStats::from_results("lions", &season(), 2).unwrap();
        assert_eq!(2, stats.matches_played);
        assert_eq!("WL", stats.form);
        assert_eq!(5, stats.goals_scored);
    }

    #[test]
    fn form_capped_at_five() {
        let results: Vec<_> = (1..=8).map(|day| result("lions", "tigers", day, 0, day)).collect();
        let stats = TeamStats::from_results("lions", &results, DEFAULT_STATS_LIMIT).unwrap();
        assert_eq!(8, stats.matches_played);
        assert_eq!("WWWWW", stats.form);
    }

    #[test]
    fn aggregate_without_results() {
        assert_eq!(None, TeamStats::from_results("wolves", &season(), DEFAULT_STATS_LIMIT));
    }

    #[test]
    fn head_to_head_either_venue() {
        let mut results = season();
        results.push(result("lions", "tigers", 1, 1, 30));
        let head_to_head =
            HeadToHead::from_results("tigers", "lions", &results, DEFAULT_HEAD_TO_HEAD_LIMIT).unwrap();
        assert_eq!(0, head_to_head.team_a_wins);
        assert_eq!(2, head_to_head.team_b_wins);
        assert_eq!(1, head_to_head.draws);
        // (3 + 4 + 2) / 3
        assert_float_absolute_eq!(3.0, head_to_head.avg_goals);

        assert_eq!(None, HeadToHead::from_results("tigers", "wolves", &results, 5));
    }

    #[test]
    fn provider_from_map() {
        let mut teams = FxHashMap::default();
        teams.insert("lions".to_string(), team("lions", 10, 5, 3, 2, 15, 10, "WWDLW"));
        assert_eq!(Some(10), teams.team_stats("lions").map(|stats| stats.matches_played));
        assert_eq!(None, teams.team_stats("tigers"));

        let shared = Arc::new(teams);
        assert!(shared.team_stats("lions").is_some());
        let provider: &dyn TeamStatsProvider = &shared;
        assert!(provider.team_stats("lions").is_some());
    }

    #[test]
    fn provider_from_results() {
        let provider = ResultsProvider::with_limit(season(), 3);
        let stats = provider.team_stats("bears").unwrap();
        assert_eq!(3, stats.matches_played);
        assert_eq!("WDD", stats.form);
        assert!(provider.head_to_head("bears", "lions").is_some());
    }
}
