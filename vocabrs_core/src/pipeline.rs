//! End-to-end run: locate device, read new lookups, drop common words,
//! enrich, write the import file and move the checkpoint forward.

use std::path::PathBuf;
use tracing::info;

use crate::error::Result;
use crate::export::Exporter;
use crate::frequency::FrequencyLists;
use crate::report::{RunReport, RunWarning};
use crate::sample::{SAMPLE_POOL, sample_words};
use crate::{
    AccessCheckpoint, CheckpointStore, DeviceLocator, DevicePath, ExportRecord, ExportSink,
    VocabularyStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Lookups made on the device since the last successful run.
    Normal,
    /// Random words from the built-in pool; device and checkpoint untouched.
    Sample { size: usize },
}

#[derive(Debug)]
pub struct RunOutcome {
    pub device: Option<DevicePath>,
    /// Words that survived the frequency filter, oldest lookup first.
    pub words: Vec<String>,
    pub records: Vec<ExportRecord>,
    /// Export file, if any words were written.
    pub output: Option<PathBuf>,
    pub frequent_words: usize,
    /// Checkpoint persisted by this run.
    pub checkpoint: Option<AccessCheckpoint>,
    pub report: RunReport,
}

pub struct Pipeline {
    locator: Box<dyn DeviceLocator>,
    store: Box<dyn VocabularyStore>,
    checkpoints: Box<dyn CheckpointStore>,
    frequency: FrequencyLists,
    exporter: Exporter,
    sink: Box<dyn ExportSink>,
    language: String,
}

impl Pipeline {
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    pub fn new(
        locator: Box<dyn DeviceLocator>,
        store: Box<dyn VocabularyStore>,
        checkpoints: Box<dyn CheckpointStore>,
        frequency: FrequencyLists,
        exporter: Exporter,
        sink: Box<dyn ExportSink>,
    ) -> Self {
        Self {
            locator,
            store,
            checkpoints,
            frequency,
            exporter,
            sink,
            language: Self::DEFAULT_LANGUAGE.to_string(),
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Fatal errors are returned before the export file or the checkpoint is
    /// touched.
    pub async fn run(&self, mode: RunMode) -> Result<RunOutcome> {
        match mode {
            RunMode::Normal => self.run_normal().await,
            RunMode::Sample { size } => self.run_sample(size).await,
        }
    }

    async fn run_normal(&self) -> Result<RunOutcome> {
        let mut report = RunReport::new();

        let device = self.locator.locate()?;
        info!("Kindle found at: {device}");

        let checkpoint = self.checkpoints.read_checkpoint()?;
        let lookups = self
            .store
            .read_since(&device, checkpoint.last_access)
            .await?;
        info!(
            "Read {} lookups newer than {}",
            lookups.len(),
            checkpoint.last_access
        );

        let list = self.frequency.load(&self.language, &mut report).await?;
        let words = list.retain_uncommon(lookups.iter().map(|r| r.word.clone()));
        info!(
            "{} of {} lookups kept after frequency filter",
            words.len(),
            lookups.len()
        );

        let records = self.exporter.export(&words, &mut report).await;
        let output = self.write(&records)?;

        let next = checkpoint.advanced_past(&lookups);
        let saved = match self.checkpoints.write_checkpoint(next) {
            Ok(()) => {
                info!("Saved last access checkpoint: {}", next.last_access);
                Some(next)
            }
            Err(e) => {
                report.warn(RunWarning::CheckpointWrite {
                    reason: format!("{e:#}"),
                });
                None
            }
        };

        Ok(RunOutcome {
            device: Some(device),
            words,
            records,
            output,
            frequent_words: list.len(),
            checkpoint: saved,
            report,
        })
    }

    async fn run_sample(&self, size: usize) -> Result<RunOutcome> {
        let mut report = RunReport::new();

        let list = self.frequency.load(&self.language, &mut report).await?;
        let uncommon = list.retain_uncommon(SAMPLE_POOL.iter().map(ToString::to_string));
        let words = sample_words(&uncommon, size, &mut rand::rng());
        info!(
            "Sampled {} of {} uncommon test words",
            words.len(),
            uncommon.len()
        );

        let records = self.exporter.export(&words, &mut report).await;
        let output = self.write(&records)?;

        Ok(RunOutcome {
            device: None,
            words,
            records,
            output,
            frequent_words: list.len(),
            checkpoint: None,
            report,
        })
    }

    fn write(&self, records: &[ExportRecord]) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            return Ok(None);
        }
        let path = self.sink.write(records)?;
        info!("Exported {} words to {}", records.len(), path.display());
        Ok(Some(path))
    }
}
