//! Common-word filtering.
//!
//! A [`FrequencyList`] holds the most frequent words of a language. Lists are
//! fetched from a [`FrequencyListSource`], kept in a [`FrequencyListCache`] and
//! refreshed wholesale once older than the TTL. When a refresh fails an expired
//! cached list is still preferred over failing the run.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::report::{RunReport, RunWarning};

/// Top-N most frequent words of a language.
#[derive(Debug, Clone)]
pub struct FrequencyList {
    language: String,
    ranked: Vec<String>,
    index: HashSet<String>,
    fetched_at: DateTime<Utc>,
}

impl FrequencyList {
    /// Words are lowercased; rank order is kept for persistence.
    pub fn new(
        language: impl Into<String>,
        words: impl IntoIterator<Item = String>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let ranked: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let index = ranked.iter().cloned().collect();
        Self {
            language: language.into(),
            ranked,
            index,
            fetched_at,
        }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.ranked
    }

    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Case-insensitive exact membership.
    #[must_use]
    pub fn is_common(&self, word: &str) -> bool {
        self.index.contains(&word.trim().to_lowercase())
    }

    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.fetched_at
    }

    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.age(now) < ttl
    }

    /// Drops common and blank words, keeping the input order.
    pub fn retain_uncommon<I>(&self, words: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        words
            .into_iter()
            .filter(|w| !w.trim().is_empty() && !self.is_common(w))
            .collect()
    }
}

/// Remote origin of frequency lists.
#[async_trait]
pub trait FrequencyListSource: Send + Sync {
    /// Most frequent words first.
    async fn fetch(&self, language: &str) -> anyhow::Result<Vec<String>>;
}

/// Local persistence of the last fetched list.
pub trait FrequencyListCache: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<FrequencyList>>;
    fn save(&self, list: &FrequencyList) -> anyhow::Result<()>;
}

/// Frequency list provider combining a remote source with a TTL cache.
pub struct FrequencyLists {
    source: Box<dyn FrequencyListSource>,
    cache: Box<dyn FrequencyListCache>,
    ttl: TimeDelta,
}

impl FrequencyLists {
    pub const DEFAULT_TTL_DAYS: i64 = 30;

    pub fn new(source: Box<dyn FrequencyListSource>, cache: Box<dyn FrequencyListCache>) -> Self {
        Self {
            source,
            cache,
            ttl: TimeDelta::days(Self::DEFAULT_TTL_DAYS),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn load(&self, language: &str, report: &mut RunReport) -> Result<FrequencyList> {
        self.load_at(language, Utc::now(), report).await
    }

    pub async fn load_at(
        &self,
        language: &str,
        now: DateTime<Utc>,
        report: &mut RunReport,
    ) -> Result<FrequencyList> {
        let cached = self.cached(language);

        if let Some(list) = &cached {
            if list.is_fresh(now, self.ttl) {
                debug!(
                    "Using cached frequency list ({} words, fetched {})",
                    list.len(),
                    list.fetched_at()
                );
                return Ok(list.clone());
            }
            info!("Cached frequency list expired, refreshing");
        }

        match self.fetch(language, now).await {
            Ok(list) => {
                if let Err(e) = self.cache.save(&list) {
                    warn!("Failed to cache frequency list: {e:#}");
                }
                info!("Fetched frequency list: {} words", list.len());
                Ok(list)
            }
            Err(e) => match cached {
                Some(list) => {
                    report.warn(RunWarning::StaleFrequencyList {
                        age_days: list.age(now).num_days(),
                        reason: format!("{e:#}"),
                    });
                    Ok(list)
                }
                None => Err(Error::FrequencyListUnavailable {
                    language: language.to_string(),
                    reason: format!("{e:#}"),
                }),
            },
        }
    }

    fn cached(&self, language: &str) -> Option<FrequencyList> {
        match self.cache.load() {
            Ok(Some(list)) if list.language() == language => Some(list),
            Ok(Some(list)) => {
                info!(
                    "Cached frequency list is for '{}', not '{language}'",
                    list.language()
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable frequency cache: {e:#}");
                None
            }
        }
    }

    async fn fetch(&self, language: &str, now: DateTime<Utc>) -> anyhow::Result<FrequencyList> {
        let words = self.source.fetch(language).await?;
        let list = FrequencyList::new(language, words, now);
        if list.is_empty() {
            anyhow::bail!("source returned no words");
        }
        Ok(list)
    }
}
