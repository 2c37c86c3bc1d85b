use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;
use vocabrs_core::{FrequencyList, FrequencyListCache};

#[derive(Debug, Serialize, Deserialize)]
struct CacheDocument {
    language: String,
    fetched_at: DateTime<Utc>,
    words: Vec<String>,
}

/// Frequency list cached as a JSON document, replaced wholesale on save.
#[derive(Debug, Clone)]
pub struct JsonFrequencyCache {
    path: PathBuf,
}

impl JsonFrequencyCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrequencyListCache for JsonFrequencyCache {
    fn load(&self) -> anyhow::Result<Option<FrequencyList>> {
        if !self.path.exists() {
            debug!("No frequency cache at {}", self.path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        let doc: CacheDocument = serde_json::from_str(&content)
            .with_context(|| format!("invalid frequency cache {}", self.path.display()))?;

        Ok(Some(FrequencyList::new(
            doc.language,
            doc.words,
            doc.fetched_at,
        )))
    }

    fn save(&self, list: &FrequencyList) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let doc = CacheDocument {
            language: list.language().to_string(),
            fetched_at: list.fetched_at(),
            words: list.words().to_vec(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&doc)?)
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        debug!("Cached {} frequent words to {}", list.len(), self.path.display());
        Ok(())
    }
}
