// Data types shared by the aggregator, the ranking engine and the exporters.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Match input
// ---------------------------------------------------------------------------

/// Full-time result as published by the source feed.
///
/// The feed's code is trusted as-is and never re-derived from the score.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Home,
    Away,
    Draw,
    /// A code outside `H`/`A`/`D`, kept verbatim.
    Unrecognized(String),
}

impl Outcome {
    /// Parse a feed result code (`H`, `A`, `D`). Case and surrounding
    /// whitespace are ignored; anything else becomes `Unrecognized`.
    pub fn from_code(code: &str) -> Self {
        let trimmed = code.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "H" => Outcome::Home,
            "A" => Outcome::Away,
            "D" => Outcome::Draw,
            _ => Outcome::Unrecognized(trimmed.to_string()),
        }
    }

    /// The feed code for this outcome.
    pub fn code(&self) -> &str {
        match self {
            Outcome::Home => "H",
            Outcome::Away => "A",
            Outcome::Draw => "D",
            Outcome::Unrecognized(code) => code,
        }
    }
}

/// One played match, immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Opaque date token from the feed (not parsed).
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: i32,
    pub away_goals: i32,
    pub outcome: Outcome,
}

impl MatchResult {
    pub fn new(
        date: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_goals: i32,
        away_goals: i32,
        outcome: Outcome,
    ) -> Self {
        Self {
            date: date.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals,
            away_goals,
            outcome,
        }
    }

    /// A drawn match in which neither side scored.
    pub fn is_goalless_draw(&self) -> bool {
        self.outcome == Outcome::Draw && self.home_goals == 0 && self.away_goals == 0
    }

    /// Scoreline rendered as `home-away`.
    pub fn score(&self) -> String {
        format!("{}-{}", self.home_goals, self.away_goals)
    }
}

// ---------------------------------------------------------------------------
// Per-team accumulator
// ---------------------------------------------------------------------------

/// Season statistics for one team.
///
/// Built up by the aggregator and read-only afterwards. Goal difference and
/// adjusted points are always derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamSeasonStats {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: i32,
    pub goals_against: i32,
    /// Points under the standard 3/1/0 scheme.
    pub original_points: i32,
    pub zero_zero_draws: i32,
}

impl TeamSeasonStats {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            ..Self::default()
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for - self.goals_against
    }

    /// Points once every 0-0 draw stops earning its point.
    pub fn adjusted_points(&self) -> i32 {
        self.original_points - self.zero_zero_draws
    }
}

// ---------------------------------------------------------------------------
// Output row
// ---------------------------------------------------------------------------

/// One team's line in a recomputed season table.
///
/// Serialized field names match the published CSV headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeasonResultRow {
    pub season: String,
    pub team: String,
    pub original_position: u32,
    #[serde(rename = "NewPosition")]
    pub adjusted_position: u32,
    /// `original_position - adjusted_position`; positive means the team
    /// climbs under the adjusted rule.
    pub position_change: i32,
    pub original_points: i32,
    #[serde(rename = "NewPoints")]
    pub adjusted_points: i32,
    pub zero_zero_draws: i32,
    pub goal_difference: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_codes_parse_case_insensitively() {
        assert_eq!(Outcome::from_code("H"), Outcome::Home);
        assert_eq!(Outcome::from_code(" a "), Outcome::Away);
        assert_eq!(Outcome::from_code("d"), Outcome::Draw);
    }

    #[test]
    fn unknown_outcome_code_kept_verbatim() {
        let outcome = Outcome::from_code(" X ");
        assert_eq!(outcome, Outcome::Unrecognized("X".into()));
        assert_eq!(outcome.code(), "X");
        assert_eq!(Outcome::from_code("").code(), "");
    }

    #[test]
    fn goalless_draw_requires_draw_outcome() {
        let draw = MatchResult::new("01/01/94", "A", "B", 0, 0, Outcome::Draw);
        assert!(draw.is_goalless_draw());

        // A 0-0 scoreline labelled as a home win is taken at face value.
        let odd = MatchResult::new("01/01/94", "A", "B", 0, 0, Outcome::Home);
        assert!(!odd.is_goalless_draw());

        let score_draw = MatchResult::new("01/01/94", "A", "B", 1, 1, Outcome::Draw);
        assert!(!score_draw.is_goalless_draw());
    }

    #[test]
    fn score_renders_home_first() {
        let m = MatchResult::new("01/01/94", "A", "B", 3, 1, Outcome::Home);
        assert_eq!(m.score(), "3-1");
    }

    #[test]
    fn derived_fields() {
        let stats = TeamSeasonStats {
            goals_for: 40,
            goals_against: 52,
            original_points: 45,
            zero_zero_draws: 4,
            ..TeamSeasonStats::new("Wimbledon")
        };
        assert_eq!(stats.goal_difference(), -12);
        assert_eq!(stats.adjusted_points(), 41);
    }

    #[test]
    fn result_row_serializes_with_feed_headers() {
        let row = SeasonResultRow {
            season: "1993-94".into(),
            team: "Arsenal".into(),
            original_position: 4,
            adjusted_position: 5,
            position_change: -1,
            original_points: 71,
            adjusted_points: 65,
            zero_zero_draws: 6,
            goal_difference: 25,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["NewPosition"], 5);
        assert_eq!(json["NewPoints"], 65);
        assert_eq!(json["PositionChange"], -1);
        assert_eq!(json["ZeroZeroDraws"], 6);
    }
}
