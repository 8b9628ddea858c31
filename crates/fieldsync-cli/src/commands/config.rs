use std::path::Path;

use fieldsync_core::ConflictConfig;

use crate::cli::ConfigCommands;
use crate::config::load_config;
use crate::error::CliError;

pub fn run_config(command: &ConfigCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_config_show(config_path),
        ConfigCommands::Init { force } => run_config_init(config_path, *force),
    }
}

pub fn run_config_show(config_path: &Path) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    println!("# {}", config_path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub fn run_config_init(config_path: &Path, force: bool) -> Result<(), CliError> {
    if config_path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists; pass --force to overwrite",
            config_path.display()
        )));
    }

    ConflictConfig::default().save_to_path(config_path)?;
    println!("Wrote {}", config_path.display());
    Ok(())
}
