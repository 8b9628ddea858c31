//! FieldSync CLI - offline record stamping and sync conflict checks
//!
//! Works over JSON files so field records can be inspected and reconciled
//! without the app.

mod cli;
mod commands;
mod config;
mod error;
mod fetcher;


use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::batch::run_batch;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::detect::run_detect;
use crate::commands::resolve::run_resolve;
use crate::commands::stamp::run_stamp;
use crate::config::{load_config, resolve_config_path, CONFIG_PATH_ENV};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config, std::env::var(CONFIG_PATH_ENV).ok())?;

    match cli.command {
        Commands::Stamp {
            record,
            record_type,
            track,
            output,
        } => {
            let config = load_config(&config_path)?;
            run_stamp(
                &record,
                record_type.as_deref(),
                &track,
                output.as_deref(),
                &config,
            )
            .await?;
        }
        Commands::Detect {
            local,
            server,
            record_type,
            fields,
            entity,
            json,
        } => {
            let config = load_config(&config_path)?;
            run_detect(
                &local,
                &server,
                record_type.as_deref(),
                &fields,
                entity.as_deref(),
                json,
                &config,
            )
            .await?;
        }
        Commands::Resolve {
            local,
            server,
            strategy,
            pick,
            output,
        } => {
            run_resolve(&local, &server, &strategy, &pick, output.as_deref()).await?;
        }
        Commands::Batch {
            actions,
            server_dir,
            concurrency,
            json,
        } => {
            let config = load_config(&config_path)?;
            run_batch(&actions, &server_dir, concurrency, json, &config).await?;
        }
        Commands::Config { command } => run_config(&command, &config_path)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}

// Logs go to stderr so JSON on stdout stays machine-readable.
fn init_tracing() -> Result<(), CliError> {
    let directive: Directive = "fieldsync=info"
        .parse()
        .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
    Ok(())
}
