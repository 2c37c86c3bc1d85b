use std::path::PathBuf;
use vocabrs_core::{RunMode, RunOutcome};

/// Input parameters for the default (export) command.
#[derive(Debug, Clone, Default)]
pub struct RunInput {
    /// Sample random words instead of reading the device
    pub test: bool,
    pub output_dir: Option<PathBuf>,
    pub mount: Option<PathBuf>,
    pub no_definitions: bool,
    pub config: Option<PathBuf>,
}

/// Strategy for the export run.
///
/// Loads configuration, applies command-line overrides, runs the pipeline
/// and prints the new words, the export location and any warnings.
#[derive(Debug, Clone, Copy)]
pub struct RunStrategy;

impl super::CommandStrategy for RunStrategy {
    type Input = RunInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut config = super::load_config(input.config.as_deref())?;
        if let Some(dir) = input.output_dir {
            config.export.output_dir = Some(dir);
        }
        if let Some(mount) = input.mount {
            config.device.mount_path = Some(mount);
        }
        if input.no_definitions {
            config.dictionary.enabled = false;
        }

        let mode = if input.test {
            RunMode::Sample {
                size: config.sample.size,
            }
        } else {
            RunMode::Normal
        };

        println!("vocabrs - probable unknown words from your Kindle");
        println!("{}", "=".repeat(50));

        let pipeline = super::build_pipeline(&config)?;
        let outcome = pipeline.run(mode).await?;
        print_outcome(mode, &outcome);

        Ok(())
    }
}

fn print_outcome(mode: RunMode, outcome: &RunOutcome) {
    if let Some(device) = &outcome.device {
        println!("✓ Kindle found at: {device}");
    }

    match mode {
        RunMode::Normal => println!(
            "✓ Retrieved {} words since last access (frequent words filtered out):",
            outcome.words.len()
        ),
        RunMode::Sample { .. } => println!(
            "✓ Sampled {} random test words (frequent words filtered out):",
            outcome.words.len()
        ),
    }

    for (i, record) in outcome.records.iter().enumerate() {
        if record.definition.is_empty() {
            println!("  {}. {}", i + 1, record.word);
        } else {
            println!("  {}. {} - {}", i + 1, record.word, record.definition);
        }
    }

    match &outcome.output {
        Some(path) => println!(
            "\n✓ Exported {} words to: {}",
            outcome.records.len(),
            path.display()
        ),
        None => println!("  No new words found.\n\nNo words to export to CSV."),
    }

    println!("\nFrequent words loaded: {} words", outcome.frequent_words);

    let warnings = outcome.report.warnings();
    if !warnings.is_empty() {
        println!("\n⚠ {} warning(s):", warnings.len());
        for warning in warnings {
            println!("  - {warning}");
        }
    }
}
