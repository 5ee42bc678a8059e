// nilnil entry point.
//
// Startup sequence:
// 1. Parse command-line arguments
// 2. Initialize tracing (stderr)
// 3. Load config (copying defaults on first run)
// 4. Resolve the requested seasons
// 5. Download, parse and recompute every season
// 6. Export the results (any export failure is fatal)

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use nilnil_app::config::{self, Config};
use nilnil_app::export::Exporter;
use nilnil_app::fetch::HttpSeasonSource;
use nilnil_app::pipeline;
use nilnil_core::{season_range, SeasonCode};
use tracing::{info, warn};

/// Recompute league tables as if 0-0 draws earned no points.
#[derive(Parser, Debug)]
#[command(name = "nilnil", version)]
struct Cli {
    /// Season codes to process, comma-separated (e.g. 9394,9495)
    #[arg(long, value_delimiter = ',')]
    seasons: Vec<String>,

    /// Process every season in the configured range
    #[arg(long, conflicts_with = "seasons")]
    all: bool,

    /// Override the output directory from the config file
    #[arg(long, env = "NILNIL_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: source={}, cache={}",
        config.source.base_url,
        config.cache_dir.display()
    );

    let codes = requested_seasons(&cli, &config)?;
    info!("Processing {} season(s)", codes.len());

    let source = HttpSeasonSource::new(&config.source, config.cache_dir.clone())
        .context("failed to build HTTP client")?;
    let outputs =
        pipeline::run_seasons(&source, &codes, config.source.max_concurrent_downloads).await;

    if outputs.is_empty() {
        bail!(
            "no season could be processed ({} failed)",
            outputs.failures.len()
        );
    }

    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let exporter = Exporter::new(output_dir);
    let written = pipeline::export_all(&outputs, &exporter, &config.output.combined_file)
        .context("failed to export results")?;

    println!(
        "Processed {} season(s), skipped {}.",
        outputs.results_by_season.len(),
        outputs.failures.len()
    );
    for failure in &outputs.failures {
        println!("  skipped {}: {}", failure.code, failure.error);
    }
    println!(
        "Wrote {} file(s) to {}",
        written.len(),
        exporter.output_dir().display()
    );

    Ok(())
}

/// Seasons named on the command line, or the configured range.
///
/// Malformed codes are reported and dropped; duplicates are processed once.
fn requested_seasons(cli: &Cli, config: &Config) -> anyhow::Result<Vec<SeasonCode>> {
    let all = || {
        season_range(config.seasons.first, config.seasons.last)
            .context("invalid season range in config")
    };

    if cli.all {
        return all();
    }
    if cli.seasons.is_empty() {
        warn!("No seasons specified (use --seasons <codes> or --all); defaulting to all seasons");
        return all();
    }

    let mut seen = HashSet::new();
    let mut codes = Vec::new();
    for raw in cli.seasons.iter().filter(|s| !s.trim().is_empty()) {
        match raw.parse::<SeasonCode>() {
            Ok(code) => {
                if seen.insert(code.clone()) {
                    codes.push(code);
                }
            }
            Err(e) => warn!("Ignoring season: {e}"),
        }
    }
    Ok(codes)
}

/// Initialize tracing to stderr; stdout carries the final report.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose {
        "nilnil=debug,nilnil_app=debug,nilnil_core=debug,warn"
    } else {
        "nilnil=info,nilnil_app=info,nilnil_core=info,warn"
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
