// Season table calculation: aggregate once, rank twice, project rows.

use std::collections::HashMap;

use crate::error::InvalidMatchError;
use crate::model::{MatchResult, SeasonResultRow};
use crate::ranking::{rank, Placing, PointsRule};
use crate::standings::{aggregate, Standings};

/// Frozen statistics for a season plus both ranking passes.
#[derive(Debug, Clone)]
pub struct SeasonTable {
    pub standings: Standings,
    original: HashMap<String, u32>,
    adjusted_order: Vec<(String, u32)>,
}

impl SeasonTable {
    /// Position under the standard scheme.
    pub fn original_position(&self, team: &str) -> Option<u32> {
        self.original.get(team).copied()
    }

    /// Position once 0-0 draws stop earning a point.
    pub fn adjusted_position(&self, team: &str) -> Option<u32> {
        self.adjusted_order
            .iter()
            .find(|(name, _)| name == team)
            .map(|(_, pos)| *pos)
    }

    /// Project into export rows, in adjusted table order.
    pub fn rows(&self, season_label: &str) -> Vec<SeasonResultRow> {
        self.adjusted_order
            .iter()
            .filter_map(|(team, adjusted_position)| {
                let stats = self.standings.get(team)?;
                let original_position = self.original_position(team)?;
                Some(SeasonResultRow {
                    season: season_label.to_string(),
                    team: team.clone(),
                    original_position,
                    adjusted_position: *adjusted_position,
                    position_change: original_position as i32 - *adjusted_position as i32,
                    original_points: stats.original_points,
                    adjusted_points: stats.adjusted_points(),
                    zero_zero_draws: stats.zero_zero_draws,
                    goal_difference: stats.goal_difference(),
                })
            })
            .collect()
    }
}

fn positions(placings: &[Placing<'_>]) -> Vec<(String, u32)> {
    placings
        .iter()
        .map(|p| (p.stats.team.clone(), p.position))
        .collect()
}

/// Aggregate a season and run the original then the adjusted ranking pass
/// over the same statistics.
pub fn compute_season(matches: &[MatchResult]) -> Result<SeasonTable, InvalidMatchError> {
    let standings = aggregate(matches)?;

    let original: HashMap<String, u32> = positions(&rank(standings.as_slice(), |t| {
        PointsRule::Original.points(t)
    }))
    .into_iter()
    .collect();
    let adjusted_order = positions(&rank(standings.as_slice(), |t| {
        PointsRule::Adjusted.points(t)
    }));

    Ok(SeasonTable {
        standings,
        original,
        adjusted_order,
    })
}

/// Recompute a season's table and return one row per team, ordered by the
/// adjusted (counterfactual) position.
///
/// Pure and deterministic: the same matches always give the same rows.
pub fn calculate_table(
    matches: &[MatchResult],
    season_label: &str,
) -> Result<Vec<SeasonResultRow>, InvalidMatchError> {
    Ok(compute_season(matches)?.rows(season_label))
}

/// Number of 0-0 draws in a season's raw matches.
pub fn count_goalless_draws(matches: &[MatchResult]) -> usize {
    matches.iter().filter(|m| m.is_goalless_draw()).count()
}

/// Season-wide 0-0 draw total recovered from result rows. Each such draw
/// is counted once per side, so the per-team sum is halved.
pub fn goalless_draws_from_rows(rows: &[SeasonResultRow]) -> usize {
    let total: i32 = rows.iter().map(|r| r.zero_zero_draws).sum();
    (total / 2).max(0) as usize
}
