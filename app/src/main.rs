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

mod command;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, InfoStrategy, InitStrategy, RunInput, RunStrategy, VersionStrategy,
};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "vocabrs")]
#[command(
    about = "Export new Kindle vocabulary lookups, minus common words, for flashcard import",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Sample random words instead of reading the device (leaves last access untouched)
    #[arg(long)]
    test: bool,

    /// Directory to save the CSV file in (default: current directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Device mount point, skipping discovery
    #[arg(long, value_name = "PATH")]
    mount: Option<PathBuf>,

    /// Do not fetch definitions from the dictionary service
    #[arg(long)]
    no_definitions: bool,

    /// Config file (default: ~/vocabrs/config.json)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file
    Init,
    /// Show effective configuration and persisted state
    Info,
    /// Show version
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let result = match cli.command {
        None => {
            RunStrategy
                .execute(RunInput {
                    test: cli.test,
                    output_dir: cli.output_dir,
                    mount: cli.mount,
                    no_definitions: cli.no_definitions,
                    config: cli.config,
                })
                .await
        }
        Some(Commands::Init) => InitStrategy.execute(cli.config).await,
        Some(Commands::Info) => InfoStrategy.execute(cli.config).await,
        Some(Commands::Version) => VersionStrategy.execute(()).await,
    };

    if let Err(e) = &result {
        eprintln!("{}", failure_message(e));
    }
    std::process::exit(exit_code(&result));
}

/// Text shown on stderr for a failed command, followed by the user hint
/// when the error carries one.
fn failure_message(err: &anyhow::Error) -> String {
    let mut message = format!("✗ {err:#}");
    if let Some(hint) = err
        .downcast_ref::<vocabrs_core::Error>()
        .and_then(vocabrs_core::Error::hint)
    {
        message.push_str("\n\n");
        message.push_str(hint);
    }
    message
}

const fn exit_code(result: &anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
