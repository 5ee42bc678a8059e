// Errors raised by the standings core.

use thiserror::Error;

/// A match record the aggregator refuses to fold into a table.
///
/// Only genuinely invalid input is rejected; unusual but well-formed data
/// (an outcome that disagrees with the score, an unknown result code) is
/// accepted as given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMatchError {
    #[error(
        "negative goal count in {home_team} v {away_team} on {date}: {home_goals}-{away_goals}"
    )]
    NegativeGoals {
        date: String,
        home_team: String,
        away_team: String,
        home_goals: i32,
        away_goals: i32,
    },

    #[error("match on {date} is missing a team name")]
    EmptyTeamName { date: String },

    /// A season total for `team` no longer fits its counter.
    #[error("season totals for {team} overflow at the match on {date}")]
    TotalOverflow { team: String, date: String },
}
