// Season CSV download with an on-disk cache.
//
// Season files are immutable once a season has finished, so a cached copy
// is served as-is and the network is only touched for missing files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nilnil_core::SeasonCode;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SourceConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to download {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("cache I/O failed for {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Anything that can hand over the raw CSV bytes of a season.
#[async_trait]
pub trait SeasonSource: Send + Sync {
    async fn season_csv(&self, code: &SeasonCode) -> Result<Vec<u8>, FetchError>;
}

/// File name used both remotely and in the cache.
pub fn season_file_name(code: &SeasonCode) -> String {
    format!("season-{code}.csv")
}

// ---------------------------------------------------------------------------
// HttpSeasonSource
// ---------------------------------------------------------------------------

/// Downloads `{base_url}season-{code}.csv` and keeps a copy in `cache_dir`.
pub struct HttpSeasonSource {
    http: reqwest::Client,
    base_url: String,
    cache_dir: PathBuf,
}

impl HttpSeasonSource {
    /// Build a client from the `[source]` config section.
    pub fn new(source: &SourceConfig, cache_dir: PathBuf) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(source.timeout())
            .user_agent(source.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Http {
                url: source.base_url.clone(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: source.base_url.clone(),
            cache_dir,
        })
    }

    pub fn url_for(&self, code: &SeasonCode) -> String {
        format!("{}{}", self.base_url, season_file_name(code))
    }

    pub fn cache_path(&self, code: &SeasonCode) -> PathBuf {
        self.cache_dir.join(season_file_name(code))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let http_err = |e| FetchError::Http {
            url: url.to_string(),
            source: e,
        };
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?;
        let body = response.bytes().await.map_err(http_err)?;
        Ok(body.to_vec())
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> FetchError + '_ {
    move |e| FetchError::Io {
        path: path.display().to_string(),
        source: e,
    }
}

/// Write `body` next to `path` and rename it into place, so an interrupted
/// write never leaves a truncated file that later runs would treat as cached.
async fn write_cache_file(path: &Path, body: &[u8]) -> Result<(), FetchError> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    tokio::fs::write(&partial, body)
        .await
        .map_err(io_err(&partial))?;
    if let Err(e) = tokio::fs::rename(&partial, path).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(io_err(path)(e));
    }
    Ok(())
}

#[async_trait]
impl SeasonSource for HttpSeasonSource {
    async fn season_csv(&self, code: &SeasonCode) -> Result<Vec<u8>, FetchError> {
        let cache_path = self.cache_path(code);
        if tokio::fs::try_exists(&cache_path).await.unwrap_or(false) {
            debug!("cache hit for {}", cache_path.display());
            return tokio::fs::read(&cache_path).await.map_err(io_err(&cache_path));
        }

        let url = self.url_for(code);
        info!("Downloading {url}");
        let body = self.download(&url).await?;

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(io_err(&self.cache_dir))?;
        write_cache_file(&cache_path, &body).await?;
        info!("Cached {} ({} bytes)", cache_path.display(), body.len());

        Ok(body)
    }
}
