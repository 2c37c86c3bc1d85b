use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;
use vocabrs_core::FrequencyListSource;

/// Plain-text word list, one word per line, most frequent first.
pub struct HttpFrequencySource {
    client: Client,
    language: String,
    url: String,
    top_n: usize,
}

impl HttpFrequencySource {
    pub fn new(
        language: impl Into<String>,
        url: impl Into<String>,
        top_n: usize,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            language: language.into(),
            url: url.into(),
            top_n,
        })
    }
}

/// Lowercased words longer than one character, first `top_n` only.
#[must_use]
pub fn parse_word_list(text: &str, top_n: usize) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| word.chars().count() > 1)
        .take(top_n)
        .collect()
}

#[async_trait]
impl FrequencyListSource for HttpFrequencySource {
    async fn fetch(&self, language: &str) -> anyhow::Result<Vec<String>> {
        if language != self.language {
            anyhow::bail!("no frequency source configured for '{language}'");
        }

        info!("Downloading frequency list from {}", self.url);
        let text = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to download frequent words")?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_word_list(&text, self.top_n))
    }
}
