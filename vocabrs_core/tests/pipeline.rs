//! Integration tests for the run pipeline.
//!
//! Every external dependency is replaced by an in-memory fake:
//! - device presence is a flag
//! - the vocabulary store is a vector of records filtered like the real query
//! - checkpoint, frequency cache and export sink share state with the test

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use vocabrs_core::{
    AccessCheckpoint, CheckpointStore, DefinitionLookup, DeviceLocator, DevicePath, Error,
    ExportRecord, ExportSink, Exporter, FrequencyList, FrequencyListCache, FrequencyListSource,
    FrequencyLists, LookupRecord, Pipeline, RunMode, RunWarning, VocabularyStore,
};

struct FakeDevice {
    present: bool,
}

impl DeviceLocator for FakeDevice {
    fn locate(&self) -> vocabrs_core::Result<DevicePath> {
        if self.present {
            Ok(DevicePath::new("/media/Kindle"))
        } else {
            Err(Error::DeviceNotFound {
                searched: vec!["/media/Kindle".to_string()],
            })
        }
    }
}

struct FakeStore {
    records: Vec<LookupRecord>,
}

#[async_trait]
impl VocabularyStore for FakeStore {
    async fn read_since(
        &self,
        _device: &DevicePath,
        since: i64,
    ) -> vocabrs_core::Result<Vec<LookupRecord>> {
        let mut newer: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.timestamp > since)
            .cloned()
            .collect();
        newer.sort_by_key(|r| r.timestamp);
        Ok(newer)
    }
}

#[derive(Clone, Default)]
struct MemoryCheckpoints {
    value: Arc<Mutex<Option<i64>>>,
    fail_writes: bool,
}

impl CheckpointStore for MemoryCheckpoints {
    fn read_checkpoint(&self) -> vocabrs_core::Result<AccessCheckpoint> {
        let value = *self.value.lock().unwrap();
        Ok(value.map_or(AccessCheckpoint::BEGINNING, AccessCheckpoint::new))
    }

    fn write_checkpoint(&self, checkpoint: AccessCheckpoint) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("read-only file system");
        }
        *self.value.lock().unwrap() = Some(checkpoint.last_access);
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://last_access")
    }
}

struct FixedSource(Option<Vec<&'static str>>);

#[async_trait]
impl FrequencyListSource for FixedSource {
    async fn fetch(&self, _language: &str) -> anyhow::Result<Vec<String>> {
        self.0
            .as_ref()
            .map(|w| w.iter().map(ToString::to_string).collect())
            .ok_or_else(|| anyhow::anyhow!("network unreachable"))
    }
}

#[derive(Clone, Default)]
struct MemoryCache(Arc<Mutex<Option<FrequencyList>>>);

impl FrequencyListCache for MemoryCache {
    fn load(&self) -> anyhow::Result<Option<FrequencyList>> {
        Ok(self.0.lock().unwrap().clone())
    }

    fn save(&self, list: &FrequencyList) -> anyhow::Result<()> {
        *self.0.lock().unwrap() = Some(list.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct MemorySink(Arc<Mutex<Vec<Vec<ExportRecord>>>>);

impl MemorySink {
    fn writes(&self) -> Vec<Vec<ExportRecord>> {
        self.0.lock().unwrap().clone()
    }
}

impl ExportSink for MemorySink {
    fn write(&self, records: &[ExportRecord]) -> vocabrs_core::Result<PathBuf> {
        self.0.lock().unwrap().push(records.to_vec());
        Ok(PathBuf::from("words.csv"))
    }
}

struct EchoDictionary;

#[async_trait]
impl DefinitionLookup for EchoDictionary {
    async fn define(&self, word: &str) -> anyhow::Result<Option<String>> {
        if word == "zephyr" {
            anyhow::bail!("HTTP 503");
        }
        Ok(Some(format!("meaning of {word}")))
    }
}

fn record(word: &str, timestamp: i64) -> LookupRecord {
    LookupRecord {
        word: word.to_string(),
        timestamp,
        language: "en".to_string(),
    }
}

struct Harness {
    checkpoints: MemoryCheckpoints,
    cache: MemoryCache,
    sink: MemorySink,
}

impl Harness {
    fn new() -> Self {
        Self {
            checkpoints: MemoryCheckpoints::default(),
            cache: MemoryCache::default(),
            sink: MemorySink::default(),
        }
    }

    fn pipeline(
        &self,
        present: bool,
        records: Vec<LookupRecord>,
        source: FixedSource,
        exporter: Exporter,
    ) -> Pipeline {
        Pipeline::new(
            Box::new(FakeDevice { present }),
            Box::new(FakeStore { records }),
            Box::new(self.checkpoints.clone()),
            FrequencyLists::new(Box::new(source), Box::new(self.cache.clone())),
            exporter,
            Box::new(self.sink.clone()),
        )
    }

    fn default_pipeline(&self, records: Vec<LookupRecord>) -> Pipeline {
        self.pipeline(
            true,
            records,
            FixedSource(Some(vec!["the", "a", "an"])),
            Exporter::without_definitions(),
        )
    }
}

#[tokio::test]
async fn filters_common_words_in_lookup_order() {
    let harness = Harness::new();
    let pipeline = harness.default_pipeline(vec![
        record("an", 3),
        record("the", 1),
        record("apple", 2),
        record("zephyr", 4),
    ]);

    let outcome = pipeline.run(RunMode::Normal).await.unwrap();

    assert_eq!(outcome.words, vec!["apple", "zephyr"]);
    assert_eq!(outcome.frequent_words, 3);
    assert_eq!(outcome.output, Some(PathBuf::from("words.csv")));
    assert_eq!(harness.sink.writes().len(), 1);
}

#[tokio::test]
async fn only_lookups_after_checkpoint_are_returned() {
    let harness = Harness::new();
    harness.checkpoints.write_checkpoint(AccessCheckpoint::new(100)).unwrap();
    let pipeline = harness.default_pipeline(vec![
        record("ninety", 90),
        record("hundred", 100),
        record("boundary", 101),
        record("later", 150),
    ]);

    let outcome = pipeline.run(RunMode::Normal).await.unwrap();

    assert_eq!(outcome.words, vec!["boundary", "later"]);
    assert_eq!(outcome.checkpoint, Some(AccessCheckpoint::new(150)));
}

#[tokio::test]
async fn second_run_without_new_lookups_is_empty() {
    let harness = Harness::new();
    let records = vec![record("apple", 10), record("zephyr", 20)];

    let first = harness
        .default_pipeline(records.clone())
        .run(RunMode::Normal)
        .await
        .unwrap();
    let second = harness
        .default_pipeline(records)
        .run(RunMode::Normal)
        .await
        .unwrap();

    assert_eq!(first.words.len(), 2);
    assert!(second.words.is_empty());
    assert!(second.output.is_none());
    assert_eq!(harness.sink.writes().len(), 1);
    assert_eq!(second.checkpoint, Some(AccessCheckpoint::new(20)));
}

#[tokio::test]
async fn missing_device_writes_nothing() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(
        false,
        vec![record("apple", 10)],
        FixedSource(Some(vec!["the"])),
        Exporter::without_definitions(),
    );

    let err = pipeline.run(RunMode::Normal).await.unwrap_err();

    assert!(matches!(err, Error::DeviceNotFound { .. }));
    assert!(err.to_string().contains("Attach the device"));
    assert!(harness.sink.writes().is_empty());
    assert_eq!(harness.checkpoints.read_checkpoint().unwrap(), AccessCheckpoint::BEGINNING);
}

#[tokio::test]
async fn unavailable_frequency_list_aborts_before_export() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(
        true,
        vec![record("apple", 10)],
        FixedSource(None),
        Exporter::without_definitions(),
    );

    let err = pipeline.run(RunMode::Normal).await.unwrap_err();

    assert!(matches!(err, Error::FrequencyListUnavailable { .. }));
    assert!(harness.sink.writes().is_empty());
    assert_eq!(harness.checkpoints.read_checkpoint().unwrap(), AccessCheckpoint::BEGINNING);
}

#[tokio::test]
async fn stale_cache_with_failed_refresh_still_succeeds() {
    let harness = Harness::new();
    harness
        .cache
        .save(&FrequencyList::new(
            "en",
            vec!["the".to_string()],
            Utc::now() - TimeDelta::days(31),
        ))
        .unwrap();
    let pipeline = harness.pipeline(
        true,
        vec![record("the", 1), record("apple", 2)],
        FixedSource(None),
        Exporter::without_definitions(),
    );

    let outcome = pipeline.run(RunMode::Normal).await.unwrap();

    assert_eq!(outcome.words, vec!["apple"]);
    assert!(matches!(
        outcome.report.warnings(),
        [RunWarning::StaleFrequencyList { .. }]
    ));
}

#[tokio::test]
async fn definition_failures_are_reported_not_fatal() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(
        true,
        vec![record("apple", 1), record("zephyr", 2)],
        FixedSource(Some(vec!["the"])),
        Exporter::new(Box::new(EchoDictionary)),
    );

    let outcome = pipeline.run(RunMode::Normal).await.unwrap();

    assert_eq!(outcome.records[0].definition, "meaning of apple");
    assert_eq!(outcome.records[1].definition, "");
    assert_eq!(outcome.report.warnings().len(), 1);
    assert_eq!(outcome.checkpoint, Some(AccessCheckpoint::new(2)));
}

#[tokio::test]
async fn checkpoint_write_failure_is_a_warning() {
    let mut harness = Harness::new();
    harness.checkpoints.fail_writes = true;
    let pipeline = harness.default_pipeline(vec![record("apple", 5)]);

    let outcome = pipeline.run(RunMode::Normal).await.unwrap();

    assert_eq!(outcome.words, vec!["apple"]);
    assert!(outcome.checkpoint.is_none());
    assert!(matches!(
        outcome.report.warnings(),
        [RunWarning::CheckpointWrite { .. }]
    ));
}

#[tokio::test]
async fn sample_mode_skips_device_and_checkpoint() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(
        false,
        Vec::new(),
        FixedSource(Some(vec!["the", "and", "people"])),
        Exporter::without_definitions(),
    );

    let outcome = pipeline.run(RunMode::Sample { size: 10 }).await.unwrap();

    assert!(outcome.device.is_none());
    assert!(outcome.checkpoint.is_none());
    assert_eq!(outcome.words.len(), 10);
    assert_eq!(outcome.records.len(), 10);
    assert!(
        outcome
            .words
            .iter()
            .all(|w| !["the", "and", "people"].contains(&w.as_str()))
    );
    assert_eq!(harness.checkpoints.read_checkpoint().unwrap(), AccessCheckpoint::BEGINNING);
}

#[tokio::test]
async fn sample_mode_returns_requested_size_after_filtering() {
    let common = [
        "the", "and", "people", "because", "house", "water", "about", "through",
    ];
    let harness = Harness::new();

    for _ in 0..20 {
        let pipeline = harness.pipeline(
            false,
            Vec::new(),
            FixedSource(Some(common.to_vec())),
            Exporter::without_definitions(),
        );

        let outcome = pipeline.run(RunMode::Sample { size: 10 }).await.unwrap();

        assert_eq!(outcome.words.len(), 10);
        assert!(outcome.words.iter().all(|w| !common.contains(&w.as_str())));
    }
}

#[tokio::test]
async fn sample_mode_caps_at_available_uncommon_words() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(
        false,
        Vec::new(),
        FixedSource(Some(vec!["the", "and"])),
        Exporter::without_definitions(),
    );

    let outcome = pipeline.run(RunMode::Sample { size: 500 }).await.unwrap();

    assert_eq!(outcome.words.len(), vocabrs_core::sample::SAMPLE_POOL.len() - 2);
}
