// Deterministic league ordering under a chosen points metric.

use std::cmp::Ordering;

use crate::model::TeamSeasonStats;

/// Which points total a ranking pass sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointsRule {
    /// Standard 3/1/0 scheme.
    Original,
    /// 0-0 draws earn nothing.
    Adjusted,
}

impl PointsRule {
    pub fn points(self, stats: &TeamSeasonStats) -> i32 {
        match self {
            PointsRule::Original => stats.original_points,
            PointsRule::Adjusted => stats.adjusted_points(),
        }
    }
}

/// A team's 1-based position in one ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placing<'a> {
    pub position: u32,
    pub stats: &'a TeamSeasonStats,
}

/// Points, then goal difference, then goals scored; all descending.
fn compare<F>(a: &TeamSeasonStats, b: &TeamSeasonStats, points_of: &F) -> Ordering
where
    F: Fn(&TeamSeasonStats) -> i32,
{
    points_of(b)
        .cmp(&points_of(a))
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Rank `stats` by `points_of`, returning every team with a distinct
/// position `1..=N` in table order.
///
/// The sort is stable: teams level on points, goal difference and goals
/// scored keep their input order and still get consecutive positions.
/// Nothing is mutated, so the same statistics can be ranked any number of
/// times under different metrics.
pub fn rank<'a, F>(stats: &'a [TeamSeasonStats], points_of: F) -> Vec<Placing<'a>>
where
    F: Fn(&TeamSeasonStats) -> i32,
{
    let mut ordered: Vec<&TeamSeasonStats> = stats.iter().collect();
    ordered.sort_by(|a, b| compare(a, b, &points_of));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, stats)| Placing {
            position: (i + 1) as u32,
            stats,
        })
        .collect()
}
