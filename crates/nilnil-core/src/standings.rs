// Folding a season's matches into one statistics record per team.

use std::collections::HashMap;

use tracing::debug;

use crate::error::InvalidMatchError;
use crate::model::{MatchResult, Outcome, TeamSeasonStats};

/// Per-team statistics for one season, in first-sighting order.
///
/// Teams are recorded the first time they appear in the match sequence
/// (home side before away side within a match). That order is what the
/// ranking engine sees, so it decides how exact ties fall.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    teams: Vec<TeamSeasonStats>,
    index: HashMap<String, usize>,
}

impl Standings {
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Look up a team by name.
    pub fn get(&self, team: &str) -> Option<&TeamSeasonStats> {
        self.index.get(team).map(|&i| &self.teams[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamSeasonStats> {
        self.teams.iter()
    }

    /// All teams as a slice, in first-sighting order.
    pub fn as_slice(&self) -> &[TeamSeasonStats] {
        &self.teams
    }

    fn slot(&mut self, team: &str) -> usize {
        if let Some(&i) = self.index.get(team) {
            return i;
        }
        let i = self.teams.len();
        self.teams.push(TeamSeasonStats::new(team));
        self.index.insert(team.to_string(), i);
        i
    }

    /// Apply one match to both participants.
    ///
    /// Totals are checked before they are stored. On overflow the error is
    /// returned and the caller discards the whole table.
    fn record(&mut self, m: &MatchResult) -> Result<(), InvalidMatchError> {
        let home = self.slot(&m.home_team);
        let away = self.slot(&m.away_team);
        let overflow = |team: &str| InvalidMatchError::TotalOverflow {
            team: team.to_string(),
            date: m.date.clone(),
        };

        for (i, scored, conceded) in [
            (home, m.home_goals, m.away_goals),
            (away, m.away_goals, m.home_goals),
        ] {
            let t = &mut self.teams[i];
            match (
                t.played.checked_add(1),
                t.goals_for.checked_add(scored),
                t.goals_against.checked_add(conceded),
            ) {
                (Some(played), Some(goals_for), Some(goals_against)) => {
                    t.played = played;
                    t.goals_for = goals_for;
                    t.goals_against = goals_against;
                }
                _ => return Err(overflow(&t.team)),
            }
        }

        match &m.outcome {
            Outcome::Home => self
                .award_win(home, away)
                .ok_or_else(|| overflow(&self.teams[home].team))?,
            Outcome::Away => self
                .award_win(away, home)
                .ok_or_else(|| overflow(&self.teams[away].team))?,
            Outcome::Draw => {
                let goalless = m.home_goals == 0 && m.away_goals == 0;
                for i in [home, away] {
                    let t = &mut self.teams[i];
                    let points = t.original_points.checked_add(1);
                    let blanks = if goalless {
                        t.zero_zero_draws.checked_add(1)
                    } else {
                        Some(t.zero_zero_draws)
                    };
                    let (Some(points), Some(blanks)) = (points, blanks) else {
                        return Err(overflow(&t.team));
                    };
                    t.draws += 1;
                    t.original_points = points;
                    t.zero_zero_draws = blanks;
                }
            }
            Outcome::Unrecognized(code) => {
                debug!(
                    "{} v {} on {}: unrecognized result '{}', no points awarded",
                    m.home_team, m.away_team, m.date, code
                );
            }
        }
        Ok(())
    }

    /// Three points to `winner`, a loss to `loser`. `None` if the winner's
    /// points would overflow. Win and loss counts are bounded by `played`.
    fn award_win(&mut self, winner: usize, loser: usize) -> Option<()> {
        let points = self.teams[winner].original_points.checked_add(3)?;
        self.teams[winner].original_points = points;
        self.teams[winner].wins += 1;
        self.teams[loser].losses += 1;
        Some(())
    }
}

fn validate(m: &MatchResult) -> Result<(), InvalidMatchError> {
    if m.home_goals < 0 || m.away_goals < 0 {
        return Err(InvalidMatchError::NegativeGoals {
            date: m.date.clone(),
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            home_goals: m.home_goals,
            away_goals: m.away_goals,
        });
    }
    if m.home_team.trim().is_empty() || m.away_team.trim().is_empty() {
        return Err(InvalidMatchError::EmptyTeamName {
            date: m.date.clone(),
        });
    }
    Ok(())
}

/// Build per-team statistics from a season's matches.
///
/// Every match is validated before any is applied, so an error leaves no
/// partially built table behind. Running totals that would overflow are
/// reported as `TotalOverflow` rather than wrapping. An empty sequence
/// yields empty standings.
pub fn aggregate(matches: &[MatchResult]) -> Result<Standings, InvalidMatchError> {
    for m in matches {
        validate(m)?;
    }

    let mut standings = Standings::default();
    for m in matches {
        standings.record(m)?;
    }
    Ok(standings)
}
