use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub frequency: FrequencyConfig,
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub sample: SampleConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeviceConfig {
    /// Skips discovery when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<PathBuf>,
    /// Candidate mount points, `*` matches one path segment.
    #[serde(default = "DeviceConfig::default_search_paths")]
    pub search_paths: Vec<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mount_path: None,
            search_paths: Self::default_search_paths(),
        }
    }
}

impl DeviceConfig {
    fn default_search_paths() -> Vec<String> {
        [
            "/media/Kindle",
            "/media/kindle",
            "/media/*/Kindle",
            "/media/*/kindle",
            "/mnt/Kindle",
            "/mnt/kindle",
            "/run/media/*/Kindle",
            "/run/media/*/kindle",
        ]
        .map(String::from)
        .to_vec()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Defaults to `~/vocabrs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "StorageConfig::default_checkpoint_file")]
    pub checkpoint_file: String,
    #[serde(default = "StorageConfig::default_frequency_cache_file")]
    pub frequency_cache_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            checkpoint_file: Self::default_checkpoint_file(),
            frequency_cache_file: Self::default_frequency_cache_file(),
        }
    }
}

impl StorageConfig {
    fn default_checkpoint_file() -> String {
        "last_access.txt".to_string()
    }

    fn default_frequency_cache_file() -> String {
        "frequent_words.json".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrequencyConfig {
    #[serde(default = "FrequencyConfig::default_language")]
    pub language: String,
    #[serde(default = "FrequencyConfig::default_source_url")]
    pub source_url: String,
    #[serde(default = "FrequencyConfig::default_top_n")]
    pub top_n: usize,
    #[serde(default = "FrequencyConfig::default_ttl_days")]
    pub ttl_days: i64,
    #[serde(default = "FrequencyConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            language: Self::default_language(),
            source_url: Self::default_source_url(),
            top_n: Self::default_top_n(),
            ttl_days: Self::default_ttl_days(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl FrequencyConfig {
    fn default_language() -> String {
        "en".to_string()
    }

    fn default_source_url() -> String {
        "https://raw.githubusercontent.com/first20hours/google-10000-english/master/google-10000-english-usa-no-swears-short.txt".to_string()
    }

    const fn default_top_n() -> usize {
        1000
    }

    const fn default_ttl_days() -> i64 {
        30
    }

    const fn default_timeout_secs() -> u64 {
        10
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DictionaryConfig {
    #[serde(default = "DictionaryConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "DictionaryConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "DictionaryConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "DictionaryConfig::default_max_requests_per_second")]
    pub max_requests_per_second: usize,
    #[serde(default = "DictionaryConfig::default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "DictionaryConfig::default_user_agent")]
    pub user_agent: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
            max_requests_per_second: Self::default_max_requests_per_second(),
            max_retries: Self::default_max_retries(),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl DictionaryConfig {
    const fn default_enabled() -> bool {
        true
    }

    fn default_base_url() -> String {
        "https://api.dictionaryapi.dev/api/v2/entries/en".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        10
    }

    const fn default_max_requests_per_second() -> usize {
        10
    }

    const fn default_max_retries() -> u32 {
        3
    }

    fn default_user_agent() -> String {
        format!("vocabrs/{} (vocabulary export)", env!("CARGO_PKG_VERSION"))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExportConfig {
    /// Defaults to the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "ExportConfig::default_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_name: Self::default_file_name(),
        }
    }
}

impl ExportConfig {
    fn default_file_name() -> String {
        "words.csv".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SampleConfig {
    #[serde(default = "SampleConfig::default_size")]
    pub size: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
        }
    }
}

impl SampleConfig {
    const fn default_size() -> usize {
        10
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("vocabrs"))
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Loads `~/vocabrs/config.json`, falling back to defaults when absent.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {e}", path.display()))?;
        info!("Loaded config from {}", path.display());

        Ok(config)
    }

    pub fn create_config() -> anyhow::Result<PathBuf> {
        let path = Self::default_path()?;
        Self::create_at(&path)?;
        Ok(path)
    }

    /// Writes the default configuration, refusing to overwrite.
    pub fn create_at(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::config_dir(),
        }
    }

    pub fn checkpoint_path(&self) -> anyhow::Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.storage.checkpoint_file))
    }

    pub fn frequency_cache_path(&self) -> anyhow::Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.storage.frequency_cache_file))
    }

    /// Frequency cache lifetime; rejects values chrono cannot represent.
    pub fn frequency_ttl(&self) -> anyhow::Result<TimeDelta> {
        let days = self.frequency.ttl_days;
        TimeDelta::try_days(days)
            .ok_or_else(|| anyhow::anyhow!("frequency.ttl_days = {days} is out of range"))
    }

    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir().join(&self.export.file_name)
    }
}
