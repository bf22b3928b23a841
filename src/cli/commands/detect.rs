//! Implementation of the `thesis-humanizer detect` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::adapters::ZeroGptDetector;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, DetectionReport, DetectionStatus};
use crate::domain::ports::Detector;

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Path to a plain-text file to score
    #[arg(short, long)]
    pub input: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DetectOutput {
    /// Detector outcome
    pub report: DetectionReport,
}

impl CommandOutput for DetectOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut line = format!(
            "Human: {:.1}%  AI: {:.1}%",
            report.human_percentage, report.fake_percentage
        );
        if let DetectionStatus::Degraded { reason } = &report.status {
            line.push_str(&format!("\nDetector unavailable ({reason:?}); fallback score shown."));
        }
        line
    }
}

/// Run the `detect` command
pub async fn execute(args: DetectArgs, json_mode: bool, config: &Config) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let detector = ZeroGptDetector::from_config(config)?;
    let report = detector.check(&text).await;

    output(&DetectOutput { report }, json_mode)
}
