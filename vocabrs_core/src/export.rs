use tracing::{debug, info};

use crate::report::{RunReport, RunWarning};
use crate::{DefinitionLookup, ExportRecord};

/// Turns filtered words into export records, optionally with definitions.
pub struct Exporter {
    dictionary: Option<Box<dyn DefinitionLookup>>,
}

impl Exporter {
    pub fn new(dictionary: Box<dyn DefinitionLookup>) -> Self {
        Self {
            dictionary: Some(dictionary),
        }
    }

    /// Exporter that leaves every definition empty.
    #[must_use]
    pub const fn without_definitions() -> Self {
        Self { dictionary: None }
    }

    /// One record per word, in input order. A failed lookup yields an empty
    /// definition and a warning.
    pub async fn export(&self, words: &[String], report: &mut RunReport) -> Vec<ExportRecord> {
        if self.dictionary.is_some() && !words.is_empty() {
            info!("Fetching definitions for {} words", words.len());
        }

        let mut records = Vec::with_capacity(words.len());
        for word in words {
            let word = clean_word(word);
            let definition = self.definition_for(&word, report).await;
            records.push(ExportRecord { word, definition });
        }
        records
    }

    async fn definition_for(&self, word: &str, report: &mut RunReport) -> String {
        let Some(dictionary) = &self.dictionary else {
            return String::new();
        };

        match dictionary.define(word).await {
            Ok(Some(definition)) => clean_word(&definition),
            Ok(None) => {
                debug!("No definition found for '{word}'");
                String::new()
            }
            Err(e) => {
                report.warn(RunWarning::DefinitionLookup {
                    word: word.to_string(),
                    reason: format!("{e:#}"),
                });
                String::new()
            }
        }
    }
}

/// Trims and collapses internal whitespace, including line breaks.
#[must_use]
pub fn clean_word(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
