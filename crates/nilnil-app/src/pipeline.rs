// Season pipeline: fetch -> parse -> recompute table, one season at a time,
// then hand the collected results to the exporters.
//
// Seasons are independent. A season that cannot be fetched, parsed or
// tabulated is logged and skipped; the others carry on.

use std::collections::BTreeMap;
use std::path::PathBuf;

use futures_util::stream::{self, StreamExt};
use nilnil_core::{calculate_table, InvalidMatchError, MatchResult, SeasonCode, SeasonResultRow};
use thiserror::Error;
use tracing::{info, warn};

use crate::export::{ExportError, Exporter, SeasonSummary};
use crate::fetch::{season_file_name, FetchError, SeasonSource};
use crate::loader::{parse_season_bytes, LoadError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single season was skipped.
#[derive(Debug, Error)]
pub enum SeasonError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    InvalidMatch(#[from] InvalidMatchError),

    #[error("no valid match rows found")]
    NoMatches,
}

#[derive(Debug)]
pub struct SeasonFailure {
    pub code: SeasonCode,
    pub error: SeasonError,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Everything produced by a run, keyed chronologically by season.
#[derive(Debug, Default)]
pub struct SeasonOutputs {
    pub results_by_season: BTreeMap<SeasonCode, Vec<SeasonResultRow>>,
    pub matches_by_season: BTreeMap<SeasonCode, Vec<MatchResult>>,
    pub failures: Vec<SeasonFailure>,
}

impl SeasonOutputs {
    /// True when no season produced a table.
    pub fn is_empty(&self) -> bool {
        self.results_by_season.is_empty()
    }

    /// All seasons' rows concatenated in season order.
    pub fn all_rows(&self) -> impl Iterator<Item = &SeasonResultRow> {
        self.results_by_season.values().flatten()
    }

    pub fn summaries(&self) -> Vec<SeasonSummary> {
        self.results_by_season
            .iter()
            .map(|(code, rows)| {
                let matches = self.matches_by_season.get(code).map(Vec::as_slice);
                SeasonSummary::new(code, rows, matches)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Running seasons
// ---------------------------------------------------------------------------

/// Fetch, parse and tabulate one season.
pub async fn process_season<S>(
    source: &S,
    code: &SeasonCode,
) -> Result<(Vec<MatchResult>, Vec<SeasonResultRow>), SeasonError>
where
    S: SeasonSource + ?Sized,
{
    let label = code.label();
    info!("Processing season {label} ({code})");

    let bytes = source.season_csv(code).await?;
    let matches = parse_season_bytes(&bytes, &season_file_name(code))?;
    if matches.is_empty() {
        return Err(SeasonError::NoMatches);
    }
    info!("  Loaded {} matches", matches.len());

    let rows = calculate_table(&matches, &label)?;
    info!("  Calculated table for {} teams", rows.len());

    Ok((matches, rows))
}

/// Process every requested season, at most `concurrency` at a time.
///
/// Never fails as a whole: per-season errors are collected in
/// `SeasonOutputs::failures`.
pub async fn run_seasons<S>(source: &S, codes: &[SeasonCode], concurrency: usize) -> SeasonOutputs
where
    S: SeasonSource + ?Sized,
{
    let outcomes: Vec<_> = stream::iter(codes)
        .map(|code| async move { (code, process_season(source, code).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut outputs = SeasonOutputs::default();
    for (code, outcome) in outcomes {
        match outcome {
            Ok((matches, rows)) => {
                outputs.matches_by_season.insert(code.clone(), matches);
                outputs.results_by_season.insert(code.clone(), rows);
            }
            Err(error) => {
                warn!("Could not process season {code}: {error}");
                outputs.failures.push(SeasonFailure {
                    code: code.clone(),
                    error,
                });
            }
        }
    }

    info!(
        "{} season(s) processed, {} skipped",
        outputs.results_by_season.len(),
        outputs.failures.len()
    );
    outputs
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write every export file for a run. The first sink failure aborts.
pub fn export_all(
    outputs: &SeasonOutputs,
    exporter: &Exporter,
    combined_file: &str,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = vec![exporter.export_combined(combined_file, &outputs.results_by_season)?];
    written.extend(exporter.export_results_by_season(&outputs.results_by_season)?);
    for (code, matches) in &outputs.matches_by_season {
        written.push(exporter.export_matches(code, matches)?);
    }
    written.push(exporter.export_summary(&outputs.summaries())?);
    Ok(written)
}
