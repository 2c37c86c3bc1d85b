#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod error;
pub mod export;
pub mod frequency;
pub mod pipeline;
pub mod report;
pub mod sample;

pub use error::{Error, Result};
pub use export::Exporter;
pub use frequency::{FrequencyList, FrequencyListCache, FrequencyListSource, FrequencyLists};
pub use pipeline::{Pipeline, RunMode, RunOutcome};
pub use report::{RunReport, RunWarning};

/// Location of the vocabulary database relative to the device mount.
pub const VOCABULARY_DB_RELATIVE: &str = "system/vocabulary/vocab.db";

/// Directory whose presence marks a mount as the e-reader.
pub const DEVICE_MARKER_DIR: &str = "system";

/// Mount point of a detected device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePath(PathBuf);

impl DevicePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn vocabulary_db(&self) -> PathBuf {
        self.0.join(VOCABULARY_DB_RELATIVE)
    }
}

impl std::fmt::Display for DevicePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A single dictionary lookup captured by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub word: String,
    /// Milliseconds since the Unix epoch, as stored by the device.
    pub timestamp: i64,
    pub language: String,
}

/// Boundary between already-processed and new lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AccessCheckpoint {
    pub last_access: i64,
}

impl AccessCheckpoint {
    /// Sentinel for "never run": every stored lookup is newer than this.
    pub const BEGINNING: Self = Self { last_access: 0 };

    #[must_use]
    pub const fn new(last_access: i64) -> Self {
        Self { last_access }
    }

    /// Checkpoint covering `records`, never moving backwards.
    #[must_use]
    pub fn advanced_past(self, records: &[LookupRecord]) -> Self {
        records
            .iter()
            .map(|r| r.timestamp)
            .max()
            .map_or(self, |newest| Self::new(newest.max(self.last_access)))
    }
}

/// A word ready for the flashcard import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub word: String,
    /// Empty when no definition could be obtained.
    pub definition: String,
}

/// Finds the mounted device.
pub trait DeviceLocator: Send + Sync {
    fn locate(&self) -> Result<DevicePath>;
}

/// Reads lookup records from the device's vocabulary database.
#[async_trait]
pub trait VocabularyStore: Send + Sync {
    /// Records with `timestamp > since`, oldest first.
    async fn read_since(&self, device: &DevicePath, since: i64) -> Result<Vec<LookupRecord>>;
}

/// Persists the last-access checkpoint between runs.
pub trait CheckpointStore: Send + Sync {
    /// Returns [`AccessCheckpoint::BEGINNING`] when nothing was stored yet.
    fn read_checkpoint(&self) -> Result<AccessCheckpoint>;
    fn write_checkpoint(&self, checkpoint: AccessCheckpoint) -> anyhow::Result<()>;
    fn location(&self) -> PathBuf;
}

/// External dictionary used to enrich exported words.
#[async_trait]
pub trait DefinitionLookup: Send + Sync {
    /// `Ok(None)` when the service knows no definition for `word`.
    async fn define(&self, word: &str) -> anyhow::Result<Option<String>>;
}

/// Serializes export records to their destination.
pub trait ExportSink: Send + Sync {
    fn write(&self, records: &[ExportRecord]) -> Result<PathBuf>;
}
