use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use vocabrs_core::DefinitionLookup;

use crate::rate_limit::RateLimiter;
use crate::retry::{backoff_delays, retry_with_backoff};

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: Option<String>,
}

/// First definition of the first meaning of the first entry.
fn first_definition(entries: &[Entry]) -> Option<String> {
    entries
        .first()?
        .meanings
        .first()?
        .definitions
        .first()?
        .definition
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(ToString::to_string)
}

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// Rate limiting, server errors and transport failures are transient.
    fn is_retryable(&self) -> bool {
        match self {
            Self::Status(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::Transport(e) => !e.is_decode() && !e.is_builder(),
        }
    }
}

/// Client for the free dictionary API (`<base>/<word>` returning entries).
pub struct DictionaryApiProvider {
    client: Client,
    base_url: Url,
    limiter: RateLimiter,
    retry_delays: Vec<Duration>,
}

impl DictionaryApiProvider {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    pub const DEFAULT_REQUESTS_PER_SECOND: usize = 10;

    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        info!("Creating DictionaryApiProvider for {base_url}");
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;
        let base_url = Url::parse(base_url).context("Invalid dictionary base URL")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid dictionary base URL: {base_url}");
        }

        Ok(Self {
            client,
            base_url,
            limiter: RateLimiter::per_second(Self::DEFAULT_REQUESTS_PER_SECOND),
            retry_delays: backoff_delays(Duration::from_secs(1), Self::DEFAULT_MAX_RETRIES),
        })
    }

    #[must_use]
    pub fn with_rate_limit(mut self, max_requests_per_second: usize) -> Self {
        self.limiter = RateLimiter::per_second(max_requests_per_second);
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry_delays = backoff_delays(Duration::from_secs(1), max_retries);
        self
    }

    fn entry_url(&self, word: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(word);
        }
        url
    }

    async fn try_fetch(&self, url: &Url) -> Result<Option<String>, FetchError> {
        self.limiter.acquire().await;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let entries: Vec<Entry> = response.json().await?;
        Ok(first_definition(&entries))
    }
}

#[async_trait]
impl DefinitionLookup for DictionaryApiProvider {
    async fn define(&self, word: &str) -> anyhow::Result<Option<String>> {
        let cleaned = word.trim().to_lowercase();
        if cleaned.is_empty() {
            anyhow::bail!("cannot look up an empty word");
        }

        let url = self.entry_url(&cleaned);
        debug!("Looking up definition: {url}");

        retry_with_backoff(
            || self.try_fetch(&url),
            &self.retry_delays,
            FetchError::is_retryable,
        )
        .await
        .with_context(|| {
            format!(
                "failed after {} attempt(s)",
                self.retry_delays.len() + 1
            )
        })
    }
}
