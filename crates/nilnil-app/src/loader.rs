// Season CSV parsing.
//
// Reads football-data style season files: one row per match with `Date`,
// `HomeTeam`, `AwayTeam`, `FTHG`, `FTAG` and `FTR` columns. Betting odds and
// other extra columns are ignored.

use std::io::Read;

use nilnil_core::{MatchResult, Outcome};
use serde::Deserialize;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// One match row as published. Column names follow the feed; anything not
/// listed here is skipped by the deserializer.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawMatchRow {
    #[serde(default)]
    Date: String,
    HomeTeam: String,
    AwayTeam: String,
    FTHG: i32,
    FTAG: i32,
    #[serde(default)]
    FTR: String,
}

// ---------------------------------------------------------------------------
// Reader-based loader
// ---------------------------------------------------------------------------

/// Parse every well-formed match row from `rdr`.
///
/// Rows that fail to deserialize (blank trailer lines, non-numeric goals)
/// or that lack a team name are skipped with a warning. Only a failure to
/// read the header is returned as an error.
pub fn parse_matches<R: Read>(rdr: R) -> Result<Vec<MatchResult>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);
    reader.headers()?;

    let mut matches = Vec::new();
    for (i, result) in reader.deserialize::<RawMatchRow>().enumerate() {
        match result {
            Ok(raw) => {
                if raw.HomeTeam.is_empty() || raw.AwayTeam.is_empty() {
                    warn!("skipping row {}: missing team name", i + 1);
                    continue;
                }
                matches.push(MatchResult {
                    date: raw.Date,
                    home_team: raw.HomeTeam,
                    away_team: raw.AwayTeam,
                    home_goals: raw.FTHG,
                    away_goals: raw.FTAG,
                    outcome: Outcome::from_code(&raw.FTR),
                });
            }
            Err(e) => {
                warn!("skipping malformed match row {}: {}", i + 1, e);
            }
        }
    }
    Ok(matches)
}

/// Parse a season held in memory (e.g. a freshly downloaded body).
pub fn parse_season_bytes(bytes: &[u8], origin: &str) -> Result<Vec<MatchResult>, LoadError> {
    parse_matches(bytes).map_err(|e| LoadError::Csv {
        path: origin.to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_core_columns() {
        let csv_data = "\
Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR
E0,14/08/93,Arsenal,Coventry,0,3,A
E0,14/08/93,Aston Villa,QPR,4,1,H
E0,14/08/93,Chelsea,Blackburn,1,2,A";

        let matches = parse_matches(csv_data.as_bytes()).unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].date, "14/08/93");
        assert_eq!(matches[0].home_team, "Arsenal");
        assert_eq!(matches[0].away_team, "Coventry");
        assert_eq!(matches[0].home_goals, 0);
        assert_eq!(matches[0].away_goals, 3);
        assert_eq!(matches[0].outcome, Outcome::Away);
        assert_eq!(matches[1].outcome, Outcome::Home);
    }

    #[test]
    fn extra_columns_ignored() {
        let csv_data = "\
Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR,HTHG,HTAG,HTR,B365H,B365D,B365A
E0,19/08/00,Charlton,Man City,4,0,H,2,0,H,2.1,3.2,3.5";

        let matches = parse_matches(csv_data.as_bytes()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].home_team, "Charlton");
        assert_eq!(matches[0].home_goals, 4);
    }

    #[test]
    fn fields_trimmed() {
        let csv_data = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR
 14/08/93 ,  Everton  , Southampton , 2 , 0 , H ";

        let matches = parse_matches(csv_data.as_bytes()).unwrap();
        assert_eq!(matches[0].date, "14/08/93");
        assert_eq!(matches[0].home_team, "Everton");
        assert_eq!(matches[0].away_team, "Southampton");
        assert_eq!(matches[0].home_goals, 2);
        assert_eq!(matches[0].outcome, Outcome::Home);
    }

    #[test]
    fn goalless_draw_parsed() {
        let csv_data = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR
21/08/93,Wimbledon,Leeds,0,0,D";

        let matches = parse_matches(csv_data.as_bytes()).unwrap();
        assert!(matches[0].is_goalless_draw());
    }

    #[test]
    fn unknown_result_code_kept() {
        let csv_data = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR
21/08/93,Wimbledon,Leeds,1,0,P";

        let matches = parse_matches(csv_data.as_bytes()).unwrap();
        assert_eq!(matches[0].outcome, Outcome::Unrecognized("P".into()));
    }

    #[test]
    fn malformed_rows_skipped() {
        let csv_data = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR
14/08/93,Arsenal,Coventry,0,3,A
14/08/93,Bad Row,Leeds,two,0,H
14/08/93,,Leeds,1,0,H
14/08/93,Chelsea,Blackburn,1,2,A
,,,,,";

        let matches = parse_matches(csv_data.as_bytes()).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].home_team, "Arsenal");
        assert_eq!(matches[1].home_team, "Chelsea");
    }

    #[test]
    fn short_rows_tolerated() {
        // Some seasons end with rows padded to a different width.
        let csv_data = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR,Referee
14/08/93,Arsenal,Coventry,0,3,A,K Hackett
14/08/93,Chelsea,Blackburn,1,2,A";

        let matches = parse_matches(csv_data.as_bytes()).unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn header_only_returns_empty_vec() {
        let csv_data = "Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR";
        let matches = parse_matches(csv_data.as_bytes()).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn season_bytes_parse_like_a_reader() {
        let body = b"Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n14/08/93,Arsenal,Coventry,0,3,A\n";
        let matches = parse_season_bytes(body, "season-9394.csv").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].outcome, Outcome::Away);
    }

    #[test]
    fn unreadable_header_names_its_origin() {
        let err = parse_season_bytes(&[0xff, 0xfe, b'\n'], "season-9394.csv").unwrap_err();
        match err {
            LoadError::Csv { path, .. } => assert_eq!(path, "season-9394.csv"),
        }
    }
}
