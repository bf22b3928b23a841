//! Implementation of the `thesis-humanizer validate` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::RequestArgs;
use crate::domain::models::{Config, ValidationReport, ValidationRequest};
use crate::services::QualityChecker;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: RequestArgs,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ValidateOutput {
    /// Validation outcome
    pub report: ValidationReport,
}

impl CommandOutput for ValidateOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = vec![
            format!(
                "Thesis is {}",
                if report.valid { "valid" } else { "INVALID" }
            ),
            format!(
                "Word count: {}{}",
                report.word_count,
                if report.word_count_within_limit { "" } else { " (over limit)" }
            ),
        ];
        for error in &report.errors {
            lines.push(format!("  - {error}"));
        }
        lines.join("\n")
    }
}

/// Run the `validate` command
pub async fn execute(args: ValidateArgs, json_mode: bool, config: &Config) -> Result<()> {
    let request: ValidationRequest = args.source.read().await?;

    let report = QualityChecker::from_config(&config.quality).validate(
        &request.thesis_text,
        &request.specifications,
        &request.mandatory_sources,
        &request.citations,
    );

    output(&ValidateOutput { report }, json_mode)
}
