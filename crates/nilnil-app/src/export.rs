// CSV export of recomputed tables, raw matches and per-season summaries.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use nilnil_core::{
    count_goalless_draws, goalless_draws_from_rows, MatchResult, SeasonCode, SeasonResultRow,
};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to prepare output {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// A raw match as written to `matches-{code}.csv`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MatchExportRow<'a> {
    date: &'a str,
    home_team: &'a str,
    away_team: &'a str,
    #[serde(rename = "FTHG")]
    home_goals: i32,
    #[serde(rename = "FTAG")]
    away_goals: i32,
    #[serde(rename = "FTR")]
    result: &'a str,
    score: String,
    goalless_draw: bool,
}

/// One line of `summary.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeasonSummary {
    pub season: String,
    pub code: String,
    pub teams: usize,
    pub matches: usize,
    /// Season-wide count of 0-0 draws (each match once).
    pub zero_zero_draws: usize,
    /// Teams whose position differs between the two tables.
    pub teams_moved: usize,
}

impl SeasonSummary {
    /// Summarize a season. The 0-0 total comes from the raw matches when
    /// they are available, otherwise from the per-team counts.
    pub fn new(code: &SeasonCode, rows: &[SeasonResultRow], matches: Option<&[MatchResult]>) -> Self {
        let zero_zero_draws = match matches {
            Some(matches) => count_goalless_draws(matches),
            None => goalless_draws_from_rows(rows),
        };
        Self {
            season: rows
                .first()
                .map(|r| r.season.clone())
                .unwrap_or_else(|| code.label()),
            code: code.to_string(),
            teams: rows.len(),
            matches: matches.map_or(0, <[MatchResult]>::len),
            zero_zero_draws,
            teams_moved: rows.iter().filter(|r| r.position_change != 0).count(),
        }
    }
}

/// Writes every export file beneath one output directory.
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn prepare(&self) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| ExportError::Io {
            path: self.output_dir.display().to_string(),
            source: e,
        })
    }

    fn write_records<T, I>(&self, file_name: &str, records: I) -> Result<PathBuf, ExportError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        self.prepare()?;
        let path = self.output_dir.join(file_name);
        let csv_err = |e| ExportError::Csv {
            path: path.display().to_string(),
            source: e,
        };

        let mut writer = csv::Writer::from_path(&path).map_err(csv_err)?;
        for record in records {
            writer.serialize(record).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| ExportError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(path)
    }

    /// Write one season's table to `results-{code}.csv`.
    pub fn export_season_results(
        &self,
        code: &SeasonCode,
        rows: &[SeasonResultRow],
    ) -> Result<PathBuf, ExportError> {
        let path = self.write_records(&format!("results-{code}.csv"), rows)?;
        info!("Exported results to {}", path.display());
        Ok(path)
    }

    /// Write every season's table to its own file.
    pub fn export_results_by_season(
        &self,
        results: &BTreeMap<SeasonCode, Vec<SeasonResultRow>>,
    ) -> Result<Vec<PathBuf>, ExportError> {
        results
            .iter()
            .map(|(code, rows)| self.export_season_results(code, rows))
            .collect()
    }

    /// Write all seasons' rows, in season order, into one file.
    pub fn export_combined(
        &self,
        file_name: &str,
        results: &BTreeMap<SeasonCode, Vec<SeasonResultRow>>,
    ) -> Result<PathBuf, ExportError> {
        let path = self.write_records(file_name, results.values().flatten())?;
        info!("Exported combined results to {}", path.display());
        Ok(path)
    }

    /// Write a season's raw matches, flagging 0-0 draws.
    pub fn export_matches(
        &self,
        code: &SeasonCode,
        matches: &[MatchResult],
    ) -> Result<PathBuf, ExportError> {
        let rows = matches.iter().map(|m| MatchExportRow {
            date: &m.date,
            home_team: &m.home_team,
            away_team: &m.away_team,
            home_goals: m.home_goals,
            away_goals: m.away_goals,
            result: m.outcome.code(),
            score: m.score(),
            goalless_draw: m.is_goalless_draw(),
        });
        self.write_records(&format!("matches-{code}.csv"), rows)
    }

    /// Write one summary line per season to `summary.csv`.
    pub fn export_summary(&self, summaries: &[SeasonSummary]) -> Result<PathBuf, ExportError> {
        let path = self.write_records("summary.csv", summaries)?;
        info!("Exported season summary to {}", path.display());
        Ok(path)
    }
}
