// League table recomputation under the "0-0 draws earn nothing" rule.
//
// Pure, synchronous core: aggregate a season's matches into per-team
// statistics, rank them twice (original and adjusted points) and project
// the result into export rows.

pub mod error;
pub mod model;
pub mod ranking;
pub mod season;
pub mod standings;
pub mod table;

pub use error::InvalidMatchError;
pub use model::{MatchResult, Outcome, SeasonResultRow, TeamSeasonStats};
pub use ranking::{rank, Placing, PointsRule};
pub use season::{season_label, season_range, SeasonCode, SeasonCodeError};
pub use standings::{aggregate, Standings};
pub use table::{
    calculate_table, compute_season, count_goalless_draws, goalless_draws_from_rows, SeasonTable,
};
