// Properties of the recomputed league tables, checked over generated seasons.

use std::collections::HashSet;

use nilnil_core::{
    aggregate, calculate_table, count_goalless_draws, goalless_draws_from_rows, rank, MatchResult,
    Outcome, PointsRule,
};
use proptest::prelude::*;

const TEAMS: [&str; 6] = ["Arsenal", "Blackburn", "Chelsea", "Derby", "Everton", "Fulham"];

/// A plausible match: outcome consistent with the score, distinct sides.
fn arb_match() -> impl Strategy<Value = MatchResult> {
    (0..TEAMS.len(), 1..TEAMS.len(), 0i32..5, 0i32..5).prop_map(|(home, offset, hg, ag)| {
        let away = (home + offset) % TEAMS.len();
        let outcome = match hg.cmp(&ag) {
            std::cmp::Ordering::Greater => Outcome::Home,
            std::cmp::Ordering::Less => Outcome::Away,
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        MatchResult::new("01/01/2000", TEAMS[home], TEAMS[away], hg, ag, outcome)
    })
}

fn arb_season() -> impl Strategy<Value = Vec<MatchResult>> {
    prop::collection::vec(arb_match(), 1..60)
}

proptest! {
    #[test]
    fn points_total_matches_results(matches in arb_season()) {
        let standings = aggregate(&matches).unwrap();
        let total: i32 = standings.iter().map(|t| t.original_points).sum();
        let draws = matches.iter().filter(|m| m.outcome == Outcome::Draw).count() as i32;
        let decisive = matches.len() as i32 - draws;
        prop_assert_eq!(total, 3 * decisive + 2 * draws);
    }

    #[test]
    fn adjusted_never_exceeds_original(matches in arb_season()) {
        let standings = aggregate(&matches).unwrap();
        for t in standings.iter() {
            prop_assert!(t.adjusted_points() <= t.original_points);
            prop_assert_eq!(t.adjusted_points() == t.original_points, t.zero_zero_draws == 0);
        }
    }

    #[test]
    fn rank_is_a_bijection(matches in arb_season()) {
        let standings = aggregate(&matches).unwrap();
        for rule in [PointsRule::Original, PointsRule::Adjusted] {
            let placings = rank(standings.as_slice(), |t| rule.points(t));
            let positions: HashSet<u32> = placings.iter().map(|p| p.position).collect();
            let expected: HashSet<u32> = (1..=standings.len() as u32).collect();
            prop_assert_eq!(positions, expected);
        }
    }

    #[test]
    fn position_changes_cancel_out(matches in arb_season()) {
        let rows = calculate_table(&matches, "1999-00").unwrap();
        let sum: i32 = rows.iter().map(|r| r.position_change).sum();
        prop_assert_eq!(sum, 0);
    }

    #[test]
    fn recalculation_is_byte_identical(matches in arb_season()) {
        let first = calculate_table(&matches, "1999-00").unwrap();
        let second = calculate_table(&matches, "1999-00").unwrap();
        prop_assert_eq!(&first, &second);
    }

    #[test]
    fn rows_are_in_adjusted_order(matches in arb_season()) {
        let rows = calculate_table(&matches, "1999-00").unwrap();
        for (i, row) in rows.iter().enumerate() {
            prop_assert_eq!(row.adjusted_position, i as u32 + 1);
        }
        for pair in rows.windows(2) {
            prop_assert!(pair[0].adjusted_points >= pair[1].adjusted_points);
        }
    }

    #[test]
    fn footer_totals_agree(matches in arb_season()) {
        let rows = calculate_table(&matches, "1999-00").unwrap();
        prop_assert_eq!(count_goalless_draws(&matches), goalless_draws_from_rows(&rows));
    }
}

fn scenario() -> Vec<MatchResult> {
    vec![
        MatchResult::new("14/08/93", "A", "B", 0, 0, Outcome::from_code("D")),
        MatchResult::new("15/08/93", "B", "C", 2, 1, Outcome::from_code("H")),
        MatchResult::new("16/08/93", "C", "A", 1, 1, Outcome::from_code("D")),
    ]
}

#[test]
fn three_team_scenario_statistics() {
    let standings = aggregate(&scenario()).unwrap();

    let a = standings.get("A").unwrap();
    assert_eq!((a.played, a.draws, a.wins, a.losses), (2, 2, 0, 0));
    assert_eq!(a.original_points, 2);
    assert_eq!(a.zero_zero_draws, 1);
    assert_eq!(a.adjusted_points(), 1);
    assert_eq!(a.goal_difference(), 0);

    let b = standings.get("B").unwrap();
    assert_eq!((b.played, b.wins, b.draws), (2, 1, 1));
    assert_eq!(b.original_points, 4);
    assert_eq!(b.zero_zero_draws, 1);
    assert_eq!(b.adjusted_points(), 3);
    assert_eq!(b.goal_difference(), 1);

    let c = standings.get("C").unwrap();
    assert_eq!((c.played, c.wins, c.losses, c.draws), (2, 0, 1, 1));
    assert_eq!(c.original_points, 1);
    assert_eq!(c.adjusted_points(), 1);
    assert_eq!(c.goal_difference(), -1);
}

#[test]
fn three_team_scenario_rankings() {
    let standings = aggregate(&scenario()).unwrap();

    let original: Vec<&str> = rank(standings.as_slice(), |t| PointsRule::Original.points(t))
        .iter()
        .map(|p| p.stats.team.as_str())
        .collect();
    assert_eq!(original, vec!["B", "A", "C"]);

    // A and C level on one point; A's better goal difference decides it.
    let adjusted: Vec<&str> = rank(standings.as_slice(), |t| PointsRule::Adjusted.points(t))
        .iter()
        .map(|p| p.stats.team.as_str())
        .collect();
    assert_eq!(adjusted, vec!["B", "A", "C"]);
}

#[test]
fn fully_tied_teams_still_get_distinct_positions() {
    let matches = vec![
        MatchResult::new("d", "A", "B", 1, 1, Outcome::Draw),
        MatchResult::new("d", "C", "D", 1, 1, Outcome::Draw),
    ];
    let rows = calculate_table(&matches, "2000-01").unwrap();
    let teams: Vec<&str> = rows.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(teams, vec!["A", "B", "C", "D"]);
    let positions: Vec<u32> = rows.iter().map(|r| r.adjusted_position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}
