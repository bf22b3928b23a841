//! Command-line interface
//!
//! Results go to stdout (human text or a single JSON document), logs go
//! to stderr.

pub mod commands;
pub mod output;
pub mod types;

use anyhow::{Context, Result};
use std::path::Path;

pub use types::{Cli, Commands};

use crate::domain::errors::{GenerationError, HumanizeError};
use crate::domain::models::Config;
use crate::infrastructure::config::{ConfigError, ConfigLoader};
use crate::infrastructure::logging::{scrub, LoggerImpl};
use output::{output, CommandOutput, ErrorOutput};

/// Load configuration from an explicit file or the default locations
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Load configuration, start logging and dispatch the command
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let _logger = LoggerImpl::init(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Humanize(args) => commands::humanize::execute(args, cli.json, &config).await,
        Commands::Detect(args) => commands::detect::execute(args, cli.json, &config).await,
        Commands::Validate(args) => commands::validate::execute(args, cli.json, &config).await,
        Commands::Generate(args) => commands::generate::execute(args, cli.json, &config).await,
        Commands::ExtractCitations(args) => {
            commands::extract_citations::execute(args, cli.json, &config).await
        }
        Commands::Config(args) => commands::config::execute(&args, cli.json, &config),
    }
}

/// Machine-readable name for the failure kind
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    if let Some(humanize) = err.downcast_ref::<HumanizeError>() {
        humanize.kind()
    } else if let Some(generation) = err.downcast_ref::<GenerationError>() {
        generation.kind()
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "ConfigError"
    } else if err.downcast_ref::<serde_json::Error>().is_some() {
        "InvalidRequest"
    } else if err.downcast_ref::<std::io::Error>().is_some() {
        "IoError"
    } else {
        "Error"
    }
}

/// Report a failed command and exit with status 1
///
/// In JSON mode the error document goes to stdout so callers reading the
/// result stream always get valid JSON.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let report = ErrorOutput {
        error: scrub(&format!("{err:#}")),
        kind: error_kind(&err).to_string(),
    };

    if !json_mode || output(&report, true).is_err() {
        eprintln!("{}", report.to_human());
    }
    std::process::exit(1)
}
