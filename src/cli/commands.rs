//! Command implementations

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::{LogSettings, TomlConfigAdapter, TracingLogAdapter};
use crate::app::{AppContainer, DefaultAppContainer};
use crate::cli::Cli;
use crate::config::Config;
use crate::domain::errors::DomainError;

/// Run one invocation end to end
pub fn execute(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    let log_file = TracingLogAdapter::init(&LogSettings::from_config(&config, cli.debug));
    info!("Starting dylt {}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = log_file {
        debug!("Logging to {}", path.display());
    }

    if cli.print_config {
        print!("{}", TomlConfigAdapter::render(&config)?);
        return Ok(());
    }

    download(cli, &config)
}

/// Defaults, then the config file, then command-line flags
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = TomlConfigAdapter::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(cli.overrides());
    config.validate().context("Invalid command-line override")?;
    Ok(config)
}

/// Execute the download command
pub fn download(cli: &Cli, config: &Config) -> Result<()> {
    let request = cli.to_request();
    debug!("Request: {:?}", request);

    let container = DefaultAppContainer::new(config);
    let response = container
        .download_interactor()
        .execute(&request, config)
        .context("Download aborted")?;

    info!("Saved {} -> {}", response.url, response.output.display());
    if response.trimmed {
        println!("Trimmed to {}", request.clip);
    }
    if let Some(note) = &response.note {
        println!("Note: {}", note.display());
    }
    println!("{}", response.output.display());
    Ok(())
}

/// One-line message naming the stage that failed
pub fn describe_error(err: &anyhow::Error) -> String {
    let stage = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<DomainError>())
        .map(DomainError::stage)
        .unwrap_or("run");

    format!("Error ({}): {}", stage, err.root_cause())
}
