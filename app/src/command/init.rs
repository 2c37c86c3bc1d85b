use std::path::PathBuf;
use vocabrs_config::Config;

/// Strategy for writing the default configuration file.
///
/// Uses `~/vocabrs/config.json` unless `--config` names another path.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = Option<PathBuf>;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let path = match input {
            Some(path) => {
                Config::create_at(&path)?;
                path
            }
            None => Config::create_config()?,
        };

        println!("✅ Created config file at: {}", path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Connect your Kindle via USB");
        println!("   2. Run 'vocabrs --test' to check the filter and export");
        println!("   3. Run 'vocabrs' to export the words looked up since the last run");
        println!();
        println!("🔧 Configuration options:");
        println!("   - device.mount_path: fixed Kindle mount point instead of searching");
        println!("   - export.output_dir: where words.csv is written");
        println!("   - dictionary.enabled: fetch definitions for each word");
        println!("   - frequency.ttl_days: how long the frequent word list is cached");
        println!();
        Ok(())
    }
}
