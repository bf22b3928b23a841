//! CLI type definitions
//!
//! Clap structures for the command-line interface.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

use super::commands::config::ConfigArgs;
use super::commands::detect::DetectArgs;
use super::commands::extract_citations::ExtractCitationsArgs;
use super::commands::generate::GenerateArgs;
use super::commands::humanize::HumanizeArgs;
use super::commands::validate::ValidateArgs;

#[derive(Parser, Debug)]
#[command(name = "thesis-humanizer")]
#[command(about = "Iteratively humanize generated academic text against an AI detector", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format (stdout carries only the JSON document)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Explicit configuration file (YAML)
    #[arg(short, long, global = true, env = "HUMANIZER_CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite a thesis until the detector rates it human enough
    Humanize(HumanizeArgs),

    /// Score a text with the detector once
    Detect(DetectArgs),

    /// Validate a thesis against length and source requirements
    Validate(ValidateArgs),

    /// Draft a thesis from an outline and sources, then extract and validate
    Generate(GenerateArgs),

    /// List the citations a thesis uses
    ExtractCitations(ExtractCitationsArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// A JSON request given inline or as a file
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Request as an inline JSON document
    #[arg(long, conflicts_with = "input", required_unless_present = "input")]
    pub request: Option<String>,

    /// Path to a file containing the JSON request
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

impl RequestArgs {
    /// Read and decode the request
    pub async fn read<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = match (&self.request, &self.input) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read request file {}", path.display()))?,
            (None, None) => anyhow::bail!("Either --request or --input is required"),
        };

        serde_json::from_str(&raw).context("Invalid JSON request")
    }
}
