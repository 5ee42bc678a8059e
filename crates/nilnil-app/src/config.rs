// Configuration loading and parsing (nilnil.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

/// Name of the single config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "nilnil.toml";

/// Earliest and latest season start years a two-digit code can express.
const MIN_START_YEAR: u32 = 1950;
const MAX_START_YEAR: u32 = 2048;

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    /// Resolved cache directory for downloaded season files.
    pub cache_dir: PathBuf,
    pub output: OutputConfig,
    pub seasons: SeasonRange,
}

// ---------------------------------------------------------------------------
// nilnil.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire nilnil.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    source: SourceConfig,
    #[serde(default)]
    cache: CacheSection,
    output: OutputConfig,
    seasons: SeasonRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Prefix that `season-{code}.csv` is appended to.
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_concurrency")]
    pub max_concurrent_downloads: usize,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_user_agent() -> String {
    format!("nilnil/{}", env!("CARGO_PKG_VERSION"))
}

fn default_concurrency() -> usize {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CacheSection {
    dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
    pub combined_file: String,
}

/// Inclusive range of season start years processed by `--all`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SeasonRange {
    pub first: u32,
    pub last: u32,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/nilnil.toml` relative to
/// `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&config_path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    let cache_dir = resolve_cache_dir(base_dir, file.cache.dir.as_deref());

    let config = Config {
        source: file.source,
        cache_dir,
        output: file.output,
        seasons: file.seasons,
    };

    validate(&config)?;

    Ok(config)
}

/// A relative `dir` is taken from `base_dir`; with no `dir` the platform
/// cache directory is used, falling back to `base_dir/cache`.
fn resolve_cache_dir(base_dir: &Path, dir: Option<&str>) -> PathBuf {
    match dir {
        Some(dir) => base_dir.join(dir),
        None => directories::ProjectDirs::from("", "", "nilnil")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| base_dir.join("cache")),
    }
}

/// Seed `config/` from `defaults/`, never touching a file the user already
/// has. Sample files (`*.example`) stay behind. Returns the files created.
///
/// A checkout with only `config/` is fine; one with neither directory is not.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(Vec::new());
        }
        return Err(seed_error(format!(
            "no defaults/ or config/ directory under {}; run nilnil from the project root",
            base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| seed_error(format!("cannot create {}: {e}", config_dir.display())))?;

    let mut created = Vec::new();
    for default in default_files(&defaults_dir)? {
        let Some(name) = default.file_name() else {
            continue;
        };
        let target = config_dir.join(name);
        if install_default(&default, &target)? {
            created.push(target);
        }
    }
    Ok(created)
}

/// Regular, non-sample files in `dir`, sorted by path.
fn default_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let listing_error = |e: std::io::Error| seed_error(format!("cannot list {}: {e}", dir.display()));

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(listing_error)? {
        let path = entry.map_err(listing_error)?.path();
        let sample = path.extension().is_some_and(|ext| ext == "example");
        if path.is_file() && !sample {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Copy `default` to `target` unless `target` exists. `create_new` makes the
/// existence check and the creation one step.
fn install_default(default: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(seed_error(format!("cannot create {}: {e}", target.display()))),
    };
    let mut src = std::fs::File::open(default)
        .map_err(|e| seed_error(format!("cannot read {}: {e}", default.display())))?;
    std::io::copy(&mut src, &mut dest)
        .map_err(|e| seed_error(format!("cannot write {}: {e}", target.display())))?;
    Ok(true)
}

fn seed_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let source = &config.source;
    if source.base_url.trim().is_empty() {
        return Err(invalid("source.base_url", "must not be empty"));
    }
    if !source.base_url.ends_with('/') {
        return Err(invalid(
            "source.base_url",
            format!("must end with '/', got {}", source.base_url),
        ));
    }
    if source.timeout_secs == 0 {
        return Err(invalid("source.timeout_secs", "must be > 0"));
    }
    if source.max_concurrent_downloads == 0 {
        return Err(invalid("source.max_concurrent_downloads", "must be > 0"));
    }

    if config.output.dir.trim().is_empty() {
        return Err(invalid("output.dir", "must not be empty"));
    }
    if config.output.combined_file.trim().is_empty() {
        return Err(invalid("output.combined_file", "must not be empty"));
    }

    let seasons = config.seasons;
    for (field, year) in [("seasons.first", seasons.first), ("seasons.last", seasons.last)] {
        if !(MIN_START_YEAR..=MAX_START_YEAR).contains(&year) {
            return Err(invalid(
                field,
                format!("must be between {MIN_START_YEAR} and {MAX_START_YEAR}, got {year}"),
            ));
        }
    }
    if seasons.first > seasons.last {
        return Err(invalid(
            "seasons.first",
            format!(
                "must not be after seasons.last ({} > {})",
                seasons.first, seasons.last
            ),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
