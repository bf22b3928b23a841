//! Implementation of the `thesis-humanizer humanize` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::adapters::{GeminiRewriter, ScriptedDetector, ScriptedRewriter, ZeroGptDetector};
use crate::cli::output::{history_table, output, CommandOutput};
use crate::cli::types::RequestArgs;
use crate::domain::models::{Config, HumanizationRequest, HumanizationResult};
use crate::domain::ports::{Detector, Rewriter};
use crate::services::{HumanizationLoop, LoopSettings};

#[derive(Args, Debug)]
pub struct HumanizeArgs {
    #[command(flatten)]
    pub source: RequestArgs,

    /// Run offline: identity rewriter and a fixed detector score
    #[arg(long)]
    pub dry_run: bool,

    /// Score reported by the offline detector
    #[arg(long, default_value_t = 50.0, requires = "dry_run")]
    pub dry_run_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct HumanizeOutput {
    /// Loop result
    pub result: HumanizationResult,
}

impl CommandOutput for HumanizeOutput {
    fn to_human(&self) -> String {
        let result = &self.result;
        let mut lines = vec![
            format!(
                "Final score: {:.1}% human after {} iteration(s) ({:?})",
                result.final_score.human_percentage, result.iterations, result.stop_reason
            ),
            String::new(),
            history_table(&result.history),
        ];
        if result.used_fallback_detection() {
            lines.push(
                "\nWarning: the detector was unavailable for at least one check; \
                 fallback scores were used."
                    .to_string(),
            );
        }
        lines.push("\n--- Humanized text ---".to_string());
        lines.push(result.humanized_text.clone());
        lines.join("\n")
    }
}

/// Collaborators for a real or offline run
fn collaborators(
    args: &HumanizeArgs,
    config: &Config,
) -> Result<(Arc<dyn Rewriter>, Arc<dyn Detector>)> {
    if args.dry_run {
        info!(score = args.dry_run_score, "Dry run: no external services are called");
        return Ok((
            Arc::new(ScriptedRewriter::identity()),
            Arc::new(ScriptedDetector::fixed(args.dry_run_score)),
        ));
    }

    Ok((
        Arc::new(GeminiRewriter::from_config(config)?),
        Arc::new(ZeroGptDetector::from_config(config)?),
    ))
}

/// Run the `humanize` command
pub async fn execute(args: HumanizeArgs, json_mode: bool, config: &Config) -> Result<()> {
    let request: HumanizationRequest = args.source.read().await?;
    let params = request.params_or(&config.humanization)?;

    let (rewriter, detector) = collaborators(&args, config)?;
    let mut settings = LoopSettings::from_config(&config.humanization);
    if args.dry_run {
        settings = settings.with_inter_iteration_delay(Duration::ZERO);
    }

    let humanizer = HumanizationLoop::new(rewriter, detector, settings);
    let result = humanizer
        .run(&request.thesis_text, &request.citations, params)
        .await?;

    output(&HumanizeOutput { result }, json_mode)
}
