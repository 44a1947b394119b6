//! Fixtures shared by the test modules.

use tinyrand::{Rand, Wyrand};

use crate::domain::TeamStats;

pub fn team(
    team_id: &str,
    matches_played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_scored: u32,
    goals_conceded: u32,
    form: &str,
) -> TeamStats {
    TeamStats {
        team_id: team_id.into(),
        matches_played,
        wins,
        draws,
        losses,
        goals_scored,
        goals_conceded,
        form: form.into(),
        home_record: None,
        away_record: None,
    }
}

/// A plausible, internally consistent record of up to 38 matches.
pub fn random_team(team_id: &str, rand: &mut Wyrand) -> TeamStats {
    let matches_played = rand.next_lim_u32(39);
    let wins = rand.next_lim_u32(matches_played + 1);
    let draws = rand.next_lim_u32(matches_played - wins + 1);
    let losses = matches_played - wins - draws;
    let goals_scored = rand.next_lim_u32(matches_played * 4 + 1);
    let goals_conceded = rand.next_lim_u32(matches_played * 4 + 1);
    let form: String = (0..u32::min(matches_played, 5))
        .map(|_| match rand.next_lim_u32(3) {
            0 => 'W',
            1 => 'D',
            _ => 'L',
        })
        .collect();
    team(team_id, matches_played, wins, draws, losses, goals_scored, goals_conceded, &form)
}
