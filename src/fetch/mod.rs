//! Player page fetching.
//!
//! The engine only ever sees raw markup; where it comes from is behind the
//! [`PageSource`] trait. [`Fetcher`] downloads pages over HTTP and
//! [`FilePageSource`] reads a saved page from disk.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::FetchConfig;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid player id: '{0}'")]
    InvalidPlayerId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
}

/// Something that can produce a player's page markup.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_player_page(&self, player_id: &str) -> Result<String, FetchError>;
}

/// Check a player id is a single, non-empty URL path segment.
pub fn validate_player_id(player_id: &str) -> Result<&str, FetchError> {
    let id = player_id.trim();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(FetchError::InvalidPlayerId(player_id.to_string()))
    }
}

/// HTTP page fetcher.
pub struct Fetcher {
    client: Client,
    base_url: Url,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("ranked-visualizer")),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// URL of a player's page.
    pub fn player_url(&self, player_id: &str) -> Result<Url, FetchError> {
        let id = validate_player_id(player_id)?;
        self.base_url
            .join(&format!("player/{}", id))
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_player_page(&self, player_id: &str) -> Result<String, FetchError> {
        let url = self.player_url(player_id)?;
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes for player {}", body.len(), player_id);
        Ok(body)
    }
}

/// Serves one saved page regardless of the requested player.
pub struct FilePageSource {
    path: PathBuf,
}

impl FilePageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageSource for FilePageSource {
    async fn fetch_player_page(&self, player_id: &str) -> Result<String, FetchError> {
        debug!("Reading page for {} from {}", player_id, self.path.display());
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}
