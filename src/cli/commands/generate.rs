//! Implementation of the `thesis-humanizer generate` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

use crate::adapters::GeminiGenerator;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::RequestArgs;
use crate::domain::models::{Config, GenerationRequest, GenerationResult};
use crate::services::{GenerationPipeline, QualityChecker};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: RequestArgs,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct GenerateOutput {
    /// Draft, citations and validation
    pub result: GenerationResult,
}

impl CommandOutput for GenerateOutput {
    fn to_human(&self) -> String {
        let result = &self.result;
        let mut lines = vec![
            format!(
                "Generated {} words with {} citations ({})",
                result.word_count,
                result.citations.len(),
                if result.validation.valid { "valid" } else { "INVALID" }
            ),
        ];
        for error in &result.validation.errors {
            lines.push(format!("  - {error}"));
        }
        lines.push(String::new());
        lines.push(result.thesis_text.clone());
        lines.join("\n")
    }
}

/// Run the `generate` command
pub async fn execute(args: GenerateArgs, json_mode: bool, config: &Config) -> Result<()> {
    let request: GenerationRequest = args.source.read().await?;

    let generator = Arc::new(GeminiGenerator::from_config(config)?);
    let pipeline = GenerationPipeline::new(
        generator.clone(),
        generator,
        QualityChecker::from_config(&config.quality),
    );
    let result = pipeline.run(&request).await?;

    output(&GenerateOutput { result }, json_mode)
}
