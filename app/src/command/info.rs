use chrono::Utc;
use std::path::PathBuf;
use tracing::info;
use vocabrs_core::{CheckpointStore, DeviceLocator, FrequencyListCache};
use vocabrs_device::FsDeviceLocator;
use vocabrs_storage::{FileCheckpointStore, JsonFrequencyCache};

/// Strategy for displaying configuration and persisted state.
///
/// This strategy outputs:
/// - Device search paths and whether a device is currently attached
/// - Checkpoint and frequency cache locations and contents
/// - Dictionary and export settings
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = Option<PathBuf>;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.as_deref())?;

        println!("=== vocabrs Configuration ===\n");

        println!("Device:");
        match &config.device.mount_path {
            Some(path) => println!("  Mount Path: {}", path.display()),
            None => println!("  Search Paths: {}", config.device.search_paths.join(", ")),
        }
        info!("Probing for device");
        let locator = FsDeviceLocator::new(config.device.search_paths.clone())
            .with_mount_path(config.device.mount_path.clone());
        match locator.locate() {
            Ok(device) => println!("  Status: Attached at {device}"),
            Err(e) => {
                println!("  Status: {e}");
                let candidates = locator.candidates();
                let existing: Vec<String> = candidates
                    .iter()
                    .filter(|p| p.exists())
                    .map(|p| p.display().to_string())
                    .collect();
                if !existing.is_empty() {
                    println!("  Potential Paths: {}", existing.join(", "));
                }
            }
        }
        println!();

        println!("Last Access:");
        let checkpoints = FileCheckpointStore::new(config.checkpoint_path()?);
        println!("  File: {}", checkpoints.location().display());
        match checkpoints.read_checkpoint() {
            Ok(checkpoint) if checkpoint.last_access == 0 => println!("  Value: (never run)"),
            Ok(checkpoint) => println!("  Value: {}", format_millis(checkpoint.last_access)),
            Err(e) => println!("  Error: {e}"),
        }
        println!();

        println!("Frequency List:");
        let cache_path = config.frequency_cache_path()?;
        println!("  Cache: {}", cache_path.display());
        println!("  Language: {}", config.frequency.language);
        println!("  Top N: {}", config.frequency.top_n);
        println!("  TTL: {} days", config.frequency.ttl_days);
        let ttl = config.frequency_ttl()?;
        match JsonFrequencyCache::new(cache_path).load() {
            Ok(Some(list)) => {
                let fresh = list.is_fresh(Utc::now(), ttl);
                println!(
                    "  Cached: {} words, fetched {} ({})",
                    list.len(),
                    list.fetched_at().format("%Y-%m-%d %H:%M"),
                    if fresh { "fresh" } else { "expired" }
                );
            }
            Ok(None) => println!("  Cached: (none)"),
            Err(e) => println!("  Cached: unreadable ({e:#})"),
        }
        println!();

        println!("Dictionary:");
        println!("  Enabled: {}", config.dictionary.enabled);
        println!("  Base URL: {}", config.dictionary.base_url);
        println!(
            "  Rate Limit: {}/s, Retries: {}, Timeout: {}s",
            config.dictionary.max_requests_per_second,
            config.dictionary.max_retries,
            config.dictionary.timeout_secs
        );
        println!();

        println!("Export:");
        println!("  File: {}", config.output_path().display());
        println!("  Sample Size: {}", config.sample.size);

        Ok(())
    }
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis).map_or_else(
        || millis.to_string(),
        |at| format!("{millis} ({})", at.format("%Y-%m-%d %H:%M:%S UTC")),
    )
}
