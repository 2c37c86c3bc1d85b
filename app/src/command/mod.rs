//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use std::path::Path;
use std::time::Duration;
use tracing::info;
use vocabrs_config::Config;
use vocabrs_core::{Exporter, FrequencyLists, Pipeline};
use vocabrs_device::FsDeviceLocator;
use vocabrs_providers::{DictionaryApiProvider, HttpFrequencySource};
use vocabrs_storage::{
    CsvExportWriter, FileCheckpointStore, JsonFrequencyCache, SqliteVocabularyStore,
};

mod info;
mod init;
mod run;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use run::{RunInput, RunStrategy};
pub use version::VersionStrategy;

/// Contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// parameters are passed without runtime casting or boxing.
pub trait CommandStrategy: Send + Sync + 'static {
    type Input;

    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn frequency_lists(config: &Config) -> anyhow::Result<FrequencyLists> {
    let source = HttpFrequencySource::new(
        config.frequency.language.clone(),
        config.frequency.source_url.clone(),
        config.frequency.top_n,
        Duration::from_secs(config.frequency.timeout_secs),
    )?;
    let cache = JsonFrequencyCache::new(config.frequency_cache_path()?);

    Ok(FrequencyLists::new(Box::new(source), Box::new(cache))
        .with_ttl(config.frequency_ttl()?))
}

fn exporter(config: &Config) -> anyhow::Result<Exporter> {
    let dictionary = &config.dictionary;
    if !dictionary.enabled {
        info!("Dictionary lookups disabled");
        return Ok(Exporter::without_definitions());
    }

    let provider = DictionaryApiProvider::new(
        &dictionary.base_url,
        Duration::from_secs(dictionary.timeout_secs),
        &dictionary.user_agent,
    )?
    .with_rate_limit(dictionary.max_requests_per_second)
    .with_max_retries(dictionary.max_retries);

    Ok(Exporter::new(Box::new(provider)))
}

/// Wire the production adapters into a pipeline.
fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let locator = FsDeviceLocator::new(config.device.search_paths.clone())
        .with_mount_path(config.device.mount_path.clone());
    let checkpoints = FileCheckpointStore::new(config.checkpoint_path()?);
    let sink = CsvExportWriter::new(config.output_path());

    info!("Last access file: {}", checkpoints.path().display());

    Ok(Pipeline::new(
        Box::new(locator),
        Box::new(SqliteVocabularyStore::new()),
        Box::new(checkpoints),
        frequency_lists(config)?,
        exporter(config)?,
        Box::new(sink),
    )
    .with_language(config.frequency.language.clone()))
}
