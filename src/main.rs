//! nixdb-client command line.
//!
//! # Commands
//! - `get <suffix>`: fetch one document and pretty-print it
//! - `watch <suffix>...`: bind each suffix in turn and print every state
//!   change as a JSON line

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;

use nixdb_client::binding::ReactiveBinding;
use nixdb_client::config::{load_config, validation::validate_config, ClientConfig, ConfigError};
use nixdb_client::fetch::Fetcher;
use nixdb_client::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "nixdb-client")]
#[command(about = "Fetch JSON documents from the nixdb data branch", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the base URL documents are fetched from.
    #[arg(short, long)]
    base_url: Option<String>,

    /// Override the request budget per fetch (0 = retry forever).
    #[arg(long)]
    max_attempts: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a document once
    Get {
        suffix: String,
    },
    /// Bind suffixes one after another and print state changes
    Watch {
        #[arg(required = true)]
        suffixes: Vec<String>,

        /// Pause between rebinds in milliseconds.
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.retries.max_attempts = max_attempts;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability.log_level);

    tracing::debug!(
        base_url = %config.base_url,
        max_attempts = config.retries.max_attempts,
        stale_policy = ?config.binding.stale_policy,
        "Configuration loaded"
    );

    let fetcher = Fetcher::new(&config)?;

    match cli.command {
        Commands::Get { suffix } => {
            let document = fetcher.fetch_path(&suffix).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Commands::Watch { suffixes, interval_ms } => {
            watch(fetcher, &config, suffixes, Duration::from_millis(interval_ms)).await?;
        }
    }

    Ok(())
}

async fn watch(
    fetcher: Fetcher,
    config: &ClientConfig,
    suffixes: Vec<String>,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut binding = ReactiveBinding::new(fetcher, Value::Null, config.binding.stale_policy);
    let mut updates = binding.updates();

    let printer = tokio::spawn(async move {
        while let Some(value) = updates.recv().await {
            println!("{}", value);
        }
    });

    let mut handles = Vec::new();
    for (i, suffix) in suffixes.iter().enumerate() {
        if i > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
        if let Some(handle) = binding.bind(suffix) {
            handles.push(handle);
        }
    }

    for handle in handles {
        let suffix = handle.suffix().to_string();
        match handle.settled().await {
            Ok(outcome) => tracing::info!(suffix = %suffix, outcome = ?outcome, "Fetch settled"),
            Err(e) => tracing::error!(suffix = %suffix, error = %e, "Fetch failed"),
        }
    }

    // Dropping the binding closes the update channel and ends the printer.
    drop(binding);
    printer.await?;
    Ok(())
}
